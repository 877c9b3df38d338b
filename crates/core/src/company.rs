//! Company status values and the company-type taxonomy.

use crate::error::CoreError;
use crate::normalize;

/// Status every company starts in.
pub const STATUS_WAITING: &str = "waiting";
/// Status set once a brochure has been delivered.
pub const STATUS_INTERESTED: &str = "interested";

/// Dropdown entry that unlocks the free-text type field. Never deletable.
pub const OTHER_TYPE: &str = "Other";

/// Brochure mail constants.
pub const BROCHURE_SUBJECT: &str = "Company Brochure";
pub const BROCHURE_BODY: &str = "Please find the brochure attached.";
pub const BROCHURE_FILE_NAME: &str = "CompanyBrochure.pdf";
pub const BROCHURE_CONTENT_TYPE: &str = "application/pdf";

/// A company's type as chosen on the form.
///
/// Both variants persist as a single `type_of_company` string. `Other`
/// additionally keeps the custom text in `other_type_of_company`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyType {
    /// A value picked from the dropdown. Picking "Other" without supplying
    /// custom text is stored as a plain `Known("Other")`.
    Known(String),
    /// Custom text entered after picking "Other".
    Other(String),
}

impl CompanyType {
    /// Resolve the dropdown selection and the free-text field into a type.
    ///
    /// Returns `None` when nothing was selected.
    pub fn from_selection(selected: Option<&str>, other: Option<&str>) -> Option<Self> {
        let selected = normalize::text_ref(selected)?;
        match normalize::text_ref(other) {
            Some(custom) if selected == OTHER_TYPE => Some(CompanyType::Other(custom.to_string())),
            _ => Some(CompanyType::Known(selected.to_string())),
        }
    }

    /// Value stored in `type_of_company`.
    pub fn stored_type(&self) -> &str {
        match self {
            CompanyType::Known(name) | CompanyType::Other(name) => name,
        }
    }

    /// Value stored in `other_type_of_company`.
    pub fn stored_other(&self) -> Option<&str> {
        match self {
            CompanyType::Known(_) => None,
            CompanyType::Other(name) => Some(name),
        }
    }
}

/// Split an optional selection into the two persisted columns.
pub fn stored_type_columns(
    selected: Option<&str>,
    other: Option<&str>,
) -> (Option<String>, Option<String>) {
    match CompanyType::from_selection(selected, other) {
        Some(t) => (
            Some(t.stored_type().to_string()),
            t.stored_other().map(str::to_string),
        ),
        None => (None, None),
    }
}

/// Reject removal of the protected "Other" entry.
pub fn ensure_type_deletable(name: &str) -> Result<(), CoreError> {
    if name == OTHER_TYPE {
        return Err(CoreError::Protected(format!(
            "Cannot delete \"{OTHER_TYPE}\" type"
        )));
    }
    Ok(())
}

/// Success message for a type removal.
pub fn type_removed_message(name: &str, affected: u64) -> String {
    format!(
        "Company type '{name}' removed from dropdown. {affected} companies had their type set to null."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn plain_selection_is_known() {
        let t = CompanyType::from_selection(Some("Logistics"), None).unwrap();
        assert_eq!(t, CompanyType::Known("Logistics".into()));
        assert_eq!(t.stored_other(), None);
    }

    #[test]
    fn other_with_text_keeps_custom_value() {
        let t = CompanyType::from_selection(Some("Other"), Some("Robotics")).unwrap();
        assert_eq!(t.stored_type(), "Robotics");
        assert_eq!(t.stored_other(), Some("Robotics"));
    }

    #[test]
    fn other_without_text_stays_other() {
        assert_eq!(
            stored_type_columns(Some("Other"), Some("")),
            (Some("Other".into()), None)
        );
    }

    #[test]
    fn custom_text_ignored_for_known_selection() {
        assert_eq!(
            stored_type_columns(Some("Logistics"), Some("Robotics")),
            (Some("Logistics".into()), None)
        );
    }

    #[test]
    fn missing_selection_stores_nothing() {
        assert_eq!(stored_type_columns(None, Some("x")), (None, None));
        assert_eq!(stored_type_columns(Some("null"), None), (None, None));
    }

    #[test]
    fn other_type_is_protected() {
        assert_matches!(ensure_type_deletable("Other"), Err(CoreError::Protected(_)));
        assert!(ensure_type_deletable("other").is_ok());
        assert!(ensure_type_deletable("Logistics").is_ok());
    }

    #[test]
    fn removal_message_names_count() {
        assert_eq!(
            type_removed_message("Retail", 2),
            "Company type 'Retail' removed from dropdown. 2 companies had their type set to null."
        );
    }
}
