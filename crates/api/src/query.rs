//! Shared query parameter types for API handlers.

use backoffice_core::error::CoreError;
use backoffice_core::types::DbId;
use backoffice_core::{normalize, search};
use serde::Deserialize;

use crate::error::AppError;

/// Query string of the paginated list endpoints.
///
/// Everything is read as text so a stray `page=abc` falls back to page 1
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub search: Option<String>,
    /// Staff list: exact role name.
    pub role: Option<String>,
    /// Follow-up list: owning company id.
    pub company_id: Option<String>,
    /// Dashboard: company name substring.
    pub company_name: Option<String>,
}

impl ListParams {
    pub fn page(&self) -> Option<i64> {
        self.page.as_deref().and_then(|p| p.trim().parse().ok())
    }

    /// `ILIKE` pattern for `search`, or `None` for no filter.
    pub fn search_pattern(&self) -> Option<String> {
        search::term(self.search.as_deref()).map(|t| search::like_pattern(&t))
    }

    pub fn role(&self) -> Option<String> {
        search::term(self.role.as_deref())
    }

    pub fn company_name_pattern(&self) -> Option<String> {
        search::term(self.company_name.as_deref()).map(|t| search::like_pattern(&t))
    }

    pub fn company_id(&self) -> Result<Option<DbId>, AppError> {
        match normalize::text_ref(self.company_id.as_deref()).map(str::trim) {
            None => Ok(None),
            Some(raw) => raw.parse().map(Some).map_err(|_| {
                AppError::Core(CoreError::Validation(
                    "The company id must be an integer.".into(),
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_falls_back_on_garbage() {
        let params = ListParams {
            page: Some("abc".into()),
            ..Default::default()
        };
        assert_eq!(params.page(), None);
        let params = ListParams {
            page: Some(" 3 ".into()),
            ..Default::default()
        };
        assert_eq!(params.page(), Some(3));
    }

    #[test]
    fn company_id_filter() {
        let mut params = ListParams::default();
        assert_eq!(params.company_id().unwrap(), None);
        params.company_id = Some("null".into());
        assert_eq!(params.company_id().unwrap(), None);
        params.company_id = Some("12".into());
        assert_eq!(params.company_id().unwrap(), Some(12));
        params.company_id = Some("x".into());
        assert!(params.company_id().is_err());
    }

    #[test]
    fn search_builds_a_substring_pattern() {
        let params = ListParams {
            search: Some(" ac ".into()),
            ..Default::default()
        };
        assert_eq!(params.search_pattern().as_deref(), Some("%ac%"));
    }
}
