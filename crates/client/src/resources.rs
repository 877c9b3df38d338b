//! Typed calls for the API's resources.
//!
//! Every collection shares one cache prefix, so a write through
//! [`ApiClient::create`], [`ApiClient::update`] or [`ApiClient::remove`]
//! invalidates every cached page and record of that resource.

use backoffice_core::pagination::PageInfo;
use backoffice_core::types::DbId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::CacheKey;
use crate::client::{ApiClient, Envelope};
use crate::error::ClientError;
use crate::hooks::{Mutation, MutationOptions, Query, QueryOptions};

/// A CRUD resource exposed under the API prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Collection path, e.g. `companies`.
    pub path: &'static str,
    /// Unpaginated list path.
    pub all_path: &'static str,
    /// Key wrapping the records inside `data`.
    pub collection: &'static str,
}

pub const STAFF: Resource = Resource {
    path: "staff",
    all_path: "all_staff",
    collection: "Staff",
};

pub const COMPANIES: Resource = Resource {
    path: "companies",
    all_path: "all_companies",
    collection: "Company",
};

pub const FOLLOW_UPS: Resource = Resource {
    path: "followup",
    all_path: "all_followup",
    collection: "Followup",
};

pub const COMPANY_TYPES_KEY: &str = "company-types";
pub const DASHBOARD_KEY: &str = "dashboard";

impl Resource {
    pub fn key(&self) -> CacheKey {
        CacheKey::from(self.path)
    }

    pub fn item_path(&self, id: DbId) -> String {
        format!("{}/{id}", self.path)
    }
}

/// One page of a paginated collection.
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<Value>,
    pub pagination: PageInfo,
}

impl Page {
    /// Split `data` of a list response into records and pagination.
    pub fn from_data(resource: Resource, data: &Value) -> Result<Self, ClientError> {
        let items = data
            .get(resource.collection)
            .cloned()
            .map(serde_json::from_value)
            .transpose()?
            .unwrap_or_default();
        let pagination = serde_json::from_value(
            data.get("Pagination").cloned().unwrap_or(Value::Null),
        )?;
        Ok(Self { items, pagination })
    }
}

/// Account returned by login.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionUser {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: String,
    pub staff_id: Option<DbId>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    #[serde(rename = "User")]
    pub user: SessionUser,
    pub token: String,
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Log in and keep the returned bearer token for later calls.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let body = serde_json::to_value(Credentials { email, password })?;
        let raw = self
            .send(reqwest::Method::POST, "login", &[], Some(&body))
            .await?;
        let envelope: Envelope<Session> = serde_json::from_value(raw)?;
        self.set_token(envelope.data.token.clone());
        tracing::info!(user_id = envelope.data.user.id, role = %envelope.data.user.role, "Logged in");
        Ok(envelope.data)
    }

    /// Revoke the current token and forget everything cached under it.
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.send(reqwest::Method::POST, "logout", &[], None).await;
        self.clear_token();
        self.cache().clear();
        result.map(|_| ())
    }

    /// Paginated list of `resource`.
    pub fn list(&self, resource: Resource, page: i64, options: QueryOptions) -> Query<'_, Value> {
        self.query(resource.path, options).param("page", page)
    }

    /// Every record of `resource`, unpaginated.
    pub fn list_all(&self, resource: Resource, options: QueryOptions) -> Query<'_, Value> {
        let options = match options.key {
            Some(_) => options,
            None => options.key(resource.key().child("all")),
        };
        self.query(resource.all_path, options)
    }

    pub fn show(&self, resource: Resource, id: DbId, options: QueryOptions) -> Query<'_, Value> {
        let options = match options.key {
            Some(_) => options,
            None => options.key(resource.key().child(id.to_string())),
        };
        self.query(resource.item_path(id), options)
    }

    /// POST to the collection, invalidating it on success.
    pub fn create(&self, resource: Resource, options: MutationOptions) -> Mutation<'_> {
        self.post_data(resource.path, invalidating(options, resource.key()))
    }

    /// PUT to one record, invalidating the collection on success.
    pub fn update(&self, resource: Resource, id: DbId, options: MutationOptions) -> Mutation<'_> {
        self.put_data(resource.item_path(id), invalidating(options, resource.key()))
    }

    /// DELETE one record, invalidating the collection on success.
    pub fn remove(&self, resource: Resource, id: DbId, options: MutationOptions) -> Mutation<'_> {
        self.delete_data(resource.item_path(id), invalidating(options, resource.key()))
    }

    /// Company-type dropdown values.
    pub fn company_types(&self, options: QueryOptions) -> Query<'_, Vec<String>> {
        let options = match options.key {
            Some(_) => options,
            None => options.key(COMPANY_TYPES_KEY),
        };
        self.query(COMPANY_TYPES_KEY, options)
    }

    /// Brochure mail. Run with `{ "companyId": .., "email": .. }`.
    pub fn send_brochure(&self, options: MutationOptions) -> Mutation<'_> {
        self.post_data(
            "companies/send-brochure",
            invalidating(options, COMPANIES.key()),
        )
    }

    /// Dashboard aggregate, optionally filtered by company name.
    pub fn dashboard(
        &self,
        page: i64,
        company_name: Option<&str>,
        options: QueryOptions,
    ) -> Query<'_, Value> {
        let query = self.query(DASHBOARD_KEY, options).param("page", page);
        match company_name {
            Some(name) => query.param("company_name", name),
            None => query,
        }
    }
}

fn invalidating(options: MutationOptions, key: CacheKey) -> MutationOptions {
    match options.invalidate {
        Some(_) => options,
        None => options.invalidate(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_splits_records_and_pagination() {
        let data = json!({
            "Company": [{ "id": 1 }, { "id": 2 }],
            "Pagination": { "current_page": 1, "last_page": 1, "per_page": 10, "total": 2 }
        });
        let page = Page::from_data(COMPANIES, &data).unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total, 2);
    }

    #[test]
    fn missing_pagination_is_an_error() {
        let data = json!({ "Staff": [] });
        assert!(Page::from_data(STAFF, &data).is_err());
    }

    #[test]
    fn record_paths_and_keys() {
        assert_eq!(FOLLOW_UPS.item_path(7), "followup/7");
        assert!(COMPANIES.key().child("7").starts_with(&COMPANIES.key()));
    }
}
