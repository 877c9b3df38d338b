use serde_json::Value;

/// Fallback notification text when a failed response carries no message.
pub const UNKNOWN_ERROR: &str = "An unknown error occurred.";

/// Errors from the API client layer.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error ({status}): {}", message.as_deref().unwrap_or(UNKNOWN_ERROR))]
    Api {
        status: u16,
        /// `message` from the error envelope, if the body was one.
        message: Option<String>,
        /// `errors` from the error envelope.
        errors: Value,
    },

    /// A body could not be encoded or did not match the expected shape.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClientError {
    /// HTTP status for API errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Text for an error notification.
    ///
    /// Joins the envelope's `errors.error` list, falling back to its
    /// `message`. Failures without a server response produce no
    /// notification.
    pub fn notification(&self) -> Option<String> {
        let ClientError::Api {
            message, errors, ..
        } = self
        else {
            return None;
        };

        let joined = errors
            .get("error")
            .and_then(Value::as_array)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .filter(|s| !s.is_empty());

        Some(
            joined
                .or_else(|| message.clone().filter(|m| !m.is_empty()))
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn api(message: Option<&str>, errors: Value) -> ClientError {
        ClientError::Api {
            status: 422,
            message: message.map(str::to_string),
            errors,
        }
    }

    #[test]
    fn generic_error_list_wins_over_message() {
        let err = api(
            Some("Cannot delete"),
            json!({ "error": ["Cannot delete \"Other\" type", "again"] }),
        );
        assert_eq!(
            err.notification().as_deref(),
            Some("Cannot delete \"Other\" type, again")
        );
    }

    #[test]
    fn field_errors_fall_back_to_message() {
        let err = api(
            Some("Validation Error."),
            json!({ "email": ["The email field is required."] }),
        );
        assert_eq!(err.notification().as_deref(), Some("Validation Error."));
    }

    #[test]
    fn bare_failure_uses_the_unknown_text() {
        assert_eq!(
            api(None, Value::Null).notification().as_deref(),
            Some(UNKNOWN_ERROR)
        );
    }
}
