//! Roles, permissions and the static capability table.
//!
//! Role names must match the seed data in
//! `20260301000001_create_roles_and_accounts.sql`. Roles stored in the
//! database that do not parse into [`Role`] carry no permissions at all.

use std::fmt;
use std::str::FromStr;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_TEACHING_STAFF: &str = "teachingstaff";
pub const ROLE_NON_TEACHING_STAFF: &str = "nonteachingstaff";

/// Role assigned to a new staff account when the request names none.
pub const DEFAULT_ROLE: &str = ROLE_STAFF;

/// The closed set of roles the capability table knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Staff,
    TeachingStaff,
    NonTeachingStaff,
}

/// A named capability checked by the access-control envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    StaffView,
    StaffManage,
    CompanyView,
    CompanyManage,
    CompanyImport,
    CompanyTypes,
    FollowUpView,
    FollowUpManage,
    DashboardView,
}

const ALL_PERMISSIONS: &[Permission] = &[
    Permission::StaffView,
    Permission::StaffManage,
    Permission::CompanyView,
    Permission::CompanyManage,
    Permission::CompanyImport,
    Permission::CompanyTypes,
    Permission::FollowUpView,
    Permission::FollowUpManage,
    Permission::DashboardView,
];

const STAFF_PERMISSIONS: &[Permission] = &[
    Permission::StaffView,
    Permission::CompanyView,
    Permission::CompanyManage,
    Permission::CompanyImport,
    Permission::FollowUpView,
    Permission::FollowUpManage,
    Permission::DashboardView,
];

const READ_ONLY_PERMISSIONS: &[Permission] = &[
    Permission::StaffView,
    Permission::CompanyView,
    Permission::FollowUpView,
    Permission::DashboardView,
];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Staff => ROLE_STAFF,
            Role::TeachingStaff => ROLE_TEACHING_STAFF,
            Role::NonTeachingStaff => ROLE_NON_TEACHING_STAFF,
        }
    }

    /// Permissions granted to this role.
    pub fn permissions(self) -> &'static [Permission] {
        match self {
            Role::Admin => ALL_PERMISSIONS,
            Role::Staff => STAFF_PERMISSIONS,
            Role::TeachingStaff | Role::NonTeachingStaff => READ_ONLY_PERMISSIONS,
        }
    }

    pub fn allows(self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(Role::Admin),
            ROLE_STAFF => Ok(Role::Staff),
            ROLE_TEACHING_STAFF => Ok(Role::TeachingStaff),
            ROLE_NON_TEACHING_STAFF => Ok(Role::NonTeachingStaff),
            other => Err(format!("Unknown role '{other}'")),
        }
    }
}

/// Check a stored role name against a permission. Unknown names are denied.
pub fn role_allows(role_name: &str, permission: Permission) -> bool {
    role_name
        .parse::<Role>()
        .map(|role| role.allows(permission))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Route table
// ---------------------------------------------------------------------------

/// What a protected route demands beyond a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Any authenticated account may call the route.
    Authenticated,
    /// The account's role must grant the permission.
    Requires(Permission),
}

/// `(method, route pattern, access)` for every protected route.
///
/// Patterns are axum route patterns relative to the API prefix.
const ROUTE_TABLE: &[(&str, &str, RouteAccess)] = &[
    ("POST", "/logout", RouteAccess::Authenticated),
    // Staff
    ("GET", "/staff", RouteAccess::Requires(Permission::StaffView)),
    ("POST", "/staff", RouteAccess::Requires(Permission::StaffManage)),
    ("GET", "/staff/{id}", RouteAccess::Requires(Permission::StaffView)),
    ("PUT", "/staff/{id}", RouteAccess::Requires(Permission::StaffManage)),
    ("DELETE", "/staff/{id}", RouteAccess::Requires(Permission::StaffManage)),
    ("GET", "/staff/{id}/pdf", RouteAccess::Requires(Permission::StaffView)),
    ("GET", "/all_staff", RouteAccess::Requires(Permission::StaffView)),
    ("GET", "/staff-file/{filename}", RouteAccess::Requires(Permission::StaffView)),
    // Companies
    ("GET", "/companies", RouteAccess::Requires(Permission::CompanyView)),
    ("POST", "/companies", RouteAccess::Requires(Permission::CompanyManage)),
    ("GET", "/companies/{id}", RouteAccess::Requires(Permission::CompanyView)),
    ("PUT", "/companies/{id}", RouteAccess::Requires(Permission::CompanyManage)),
    ("DELETE", "/companies/{id}", RouteAccess::Requires(Permission::CompanyManage)),
    ("GET", "/all_companies", RouteAccess::Requires(Permission::CompanyView)),
    ("POST", "/companies/importCompany", RouteAccess::Requires(Permission::CompanyImport)),
    ("GET", "/companies/download-template", RouteAccess::Requires(Permission::CompanyImport)),
    ("POST", "/companies/send-brochure", RouteAccess::Requires(Permission::CompanyManage)),
    ("GET", "/company-types", RouteAccess::Requires(Permission::CompanyView)),
    ("DELETE", "/company-types", RouteAccess::Requires(Permission::CompanyTypes)),
    // Follow-ups
    ("GET", "/followup", RouteAccess::Requires(Permission::FollowUpView)),
    ("POST", "/followup", RouteAccess::Requires(Permission::FollowUpManage)),
    ("GET", "/followup/{id}", RouteAccess::Requires(Permission::FollowUpView)),
    ("PUT", "/followup/{id}", RouteAccess::Requires(Permission::FollowUpManage)),
    ("DELETE", "/followup/{id}", RouteAccess::Requires(Permission::FollowUpManage)),
    ("GET", "/all_followup", RouteAccess::Requires(Permission::FollowUpView)),
    // Dashboard
    ("GET", "/dashboard", RouteAccess::Requires(Permission::DashboardView)),
];

/// Look up the access rule for a matched route.
///
/// Returns `None` for routes missing from the table; callers deny those.
pub fn route_access(method: &str, pattern: &str) -> Option<RouteAccess> {
    ROUTE_TABLE
        .iter()
        .find(|(m, p, _)| *m == method && *p == pattern)
        .map(|(_, _, access)| *access)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_names_round_trip() {
        for role in [
            Role::Admin,
            Role::Staff,
            Role::TeachingStaff,
            Role::NonTeachingStaff,
        ] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
    }

    #[test]
    fn admin_has_every_permission() {
        for permission in ALL_PERMISSIONS {
            assert!(Role::Admin.allows(*permission));
        }
    }

    #[test]
    fn staff_cannot_manage_staff_or_types() {
        assert!(!Role::Staff.allows(Permission::StaffManage));
        assert!(!Role::Staff.allows(Permission::CompanyTypes));
        assert!(Role::Staff.allows(Permission::CompanyImport));
    }

    #[test]
    fn teaching_staff_is_read_only() {
        assert!(Role::TeachingStaff.allows(Permission::CompanyView));
        assert!(!Role::TeachingStaff.allows(Permission::CompanyManage));
        assert!(!Role::NonTeachingStaff.allows(Permission::FollowUpManage));
    }

    #[test]
    fn unknown_role_is_denied() {
        assert!(!role_allows("librarian", Permission::StaffView));
        assert!(role_allows("admin", Permission::StaffManage));
    }

    #[test]
    fn route_table_lookup() {
        assert_eq!(
            route_access("PUT", "/staff/{id}"),
            Some(RouteAccess::Requires(Permission::StaffManage))
        );
        assert_eq!(route_access("POST", "/logout"), Some(RouteAccess::Authenticated));
        assert_eq!(route_access("PATCH", "/staff/{id}"), None);
    }

    #[test]
    fn every_route_pattern_is_unique() {
        for (i, (m, p, _)) in ROUTE_TABLE.iter().enumerate() {
            let dupes = ROUTE_TABLE
                .iter()
                .skip(i + 1)
                .filter(|(m2, p2, _)| m2 == m && p2 == p)
                .count();
            assert_eq!(dupes, 0, "duplicate route entry {m} {p}");
        }
    }
}
