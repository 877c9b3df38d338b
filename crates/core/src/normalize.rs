//! Sentinel-to-null normalization for client input.
//!
//! Form clients send the literal strings `"null"`, `"undefined"` or an empty
//! string for fields the user left blank. Every text field entering the
//! system is folded to a real null before it reaches a handler.

use serde_json::Value;

/// Strings treated as "no value".
pub const NULL_SENTINELS: &[&str] = &["null", "", "undefined"];

/// Whether `value` is one of the [`NULL_SENTINELS`].
pub fn is_null_sentinel(value: &str) -> bool {
    NULL_SENTINELS.contains(&value)
}

/// Fold a sentinel string to `None`.
pub fn text(value: Option<String>) -> Option<String> {
    value.filter(|v| !is_null_sentinel(v))
}

/// Borrowing variant of [`text`].
pub fn text_ref(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !is_null_sentinel(v))
}

/// Rewrite top-level sentinel string fields of a JSON object to null.
///
/// Nested values are left untouched. Returns the number of rewritten fields.
pub fn object_fields(value: &mut Value) -> usize {
    let Value::Object(map) = value else {
        return 0;
    };

    let mut rewritten = 0;
    for field in map.values_mut() {
        if matches!(field, Value::String(s) if is_null_sentinel(s)) {
            *field = Value::Null;
            rewritten += 1;
        }
    }
    rewritten
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sentinels_fold_to_none() {
        assert_eq!(text(Some("null".into())), None);
        assert_eq!(text(Some("undefined".into())), None);
        assert_eq!(text(Some(String::new())), None);
        assert_eq!(text(Some("Null".into())), Some("Null".into()));
        assert_eq!(text(Some(" ".into())), Some(" ".into()));
    }

    #[test]
    fn object_rewrites_top_level_only() {
        let mut body = json!({
            "name": "null",
            "area": "",
            "city": "undefined",
            "state": "Kerala",
            "nested": { "inner": "null" },
            "count": 3
        });

        assert_eq!(object_fields(&mut body), 3);
        assert_eq!(body["name"], Value::Null);
        assert_eq!(body["area"], Value::Null);
        assert_eq!(body["city"], Value::Null);
        assert_eq!(body["state"], "Kerala");
        assert_eq!(body["nested"]["inner"], "null");
        assert_eq!(body["count"], 3);
    }

    #[test]
    fn non_objects_are_ignored() {
        let mut body = json!(["null", ""]);
        assert_eq!(object_fields(&mut body), 0);
        assert_eq!(body, json!(["null", ""]));
    }
}
