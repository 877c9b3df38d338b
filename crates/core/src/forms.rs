//! Lenient field deserializers for form-shaped request bodies.
//!
//! Staff and company forms arrive either as JSON or as multipart text
//! fields that the API layer folds into a JSON object. In the multipart case
//! every scalar is a string and every list may be either repeated fields or
//! a JSON-encoded string, so the input structs accept all of those shapes.
//! Sentinel strings (see [`crate::normalize`]) always deserialize as `None`.

use chrono::NaiveDate;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::normalize;
use crate::types::DbId;

/// Optional text. Numbers and booleans are accepted and stringified.
pub fn opt_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(normalize::text(Some(s))),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a text value, found {}",
            kind(&other)
        ))),
    }
}

/// Optional flag. Accepts booleans, `0`/`1` and their string forms.
pub fn opt_bool<'de, D>(d: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) => match n.as_i64() {
            Some(0) => Ok(Some(false)),
            Some(1) => Ok(Some(true)),
            _ => Err(D::Error::custom(format!("invalid flag value {n}"))),
        },
        Some(Value::String(s)) => parse_flag(&s).map_err(D::Error::custom),
        Some(other) => Err(D::Error::custom(format!(
            "expected a flag, found {}",
            kind(&other)
        ))),
    }
}

fn parse_flag(s: &str) -> Result<Option<bool>, String> {
    if normalize::is_null_sentinel(s) {
        return Ok(None);
    }
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Ok(Some(true)),
        "0" | "false" | "off" | "no" => Ok(Some(false)),
        other => Err(format!("invalid flag value '{other}'")),
    }
}

/// Optional numeric id given as a number or a numeric string.
pub fn opt_id<'de, D>(d: D) -> Result<Option<DbId>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(v) => id_value(&v).map_err(D::Error::custom),
    }
}

fn id_value(v: &Value) -> Result<Option<DbId>, String> {
    match v {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| format!("invalid id {n}")),
        Value::String(s) if normalize::is_null_sentinel(s) => Ok(None),
        Value::String(s) => s
            .trim()
            .parse::<DbId>()
            .map(Some)
            .map_err(|_| format!("invalid id '{s}'")),
        other => Err(format!("expected an id, found {}", kind(other))),
    }
}

/// Optional calendar date in `YYYY-MM-DD` form.
pub fn opt_date<'de, D>(d: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match opt_text(d)? {
        None => Ok(None),
        Some(s) => parse_date(&s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("'{s}' is not a valid date"))),
    }
}

/// Parse a date, accepting a plain date or the date part of a timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.split(['T', ' ']).next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// Optional list of opaque identifiers (course, semester, subject ids).
///
/// Accepts an array, a JSON-encoded array string, or a single scalar.
pub fn opt_value_list<'de, D>(d: D) -> Result<Option<Vec<Value>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(Value::String(s)) if normalize::is_null_sentinel(&s) => Ok(None),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Array(items)) => Ok(Some(items)),
            Ok(Value::Null) => Ok(None),
            Ok(scalar @ (Value::Number(_) | Value::String(_))) => Ok(Some(vec![scalar])),
            _ => Ok(Some(vec![Value::String(s)])),
        },
        Some(scalar @ Value::Number(_)) => Ok(Some(vec![scalar])),
        Some(other) => Err(D::Error::custom(format!(
            "expected a list, found {}",
            kind(&other)
        ))),
    }
}

/// Optional list of numeric ids. Accepts an array, a JSON-encoded array,
/// a comma-separated string or a single id.
pub fn opt_id_list<'de, D>(d: D) -> Result<Option<Vec<DbId>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(Value::String(s)) if normalize::is_null_sentinel(&s) => return Ok(None),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(&s) {
            Ok(Value::Array(items)) => items,
            _ => s
                .split(',')
                .map(|part| Value::String(part.trim().to_string()))
                .collect(),
        },
        Some(other) => vec![other],
    };

    let mut ids = Vec::with_capacity(items.len());
    for item in &items {
        if let Some(id) = id_value(item).map_err(D::Error::custom)? {
            ids.push(id);
        }
    }
    Ok(Some(ids))
}

/// Optional list of structured entries given as an array or as a
/// JSON-encoded string.
pub fn opt_json_list<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if normalize::is_null_sentinel(&s) => return Ok(None),
        Some(Value::String(s)) => serde_json::from_str::<Value>(&s)
            .map_err(|e| D::Error::custom(format!("invalid JSON list: {e}")))?,
        Some(v) => v,
    };

    match value {
        Value::Null => Ok(None),
        Value::Array(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(D::Error::custom),
        other => Err(D::Error::custom(format!(
            "expected a list, found {}",
            kind(&other)
        ))),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Default, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_text")]
        text: Option<String>,
        #[serde(default, deserialize_with = "opt_bool")]
        flag: Option<bool>,
        #[serde(default, deserialize_with = "opt_id")]
        id: Option<DbId>,
        #[serde(default, deserialize_with = "opt_date")]
        date: Option<NaiveDate>,
        #[serde(default, deserialize_with = "opt_value_list")]
        values: Option<Vec<Value>>,
        #[serde(default, deserialize_with = "opt_id_list")]
        ids: Option<Vec<DbId>>,
        #[serde(default, deserialize_with = "opt_json_list")]
        entries: Option<Vec<Entry>>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Entry {
        title: String,
    }

    fn probe(v: Value) -> Probe {
        serde_json::from_value(v).expect("probe should deserialize")
    }

    #[test]
    fn missing_fields_are_none() {
        let p = probe(json!({}));
        assert!(p.text.is_none() && p.flag.is_none() && p.id.is_none());
        assert!(p.values.is_none() && p.ids.is_none() && p.entries.is_none());
    }

    #[test]
    fn text_accepts_scalars_and_folds_sentinels() {
        assert_eq!(probe(json!({"text": 682001})).text.as_deref(), Some("682001"));
        assert_eq!(probe(json!({"text": "undefined"})).text, None);
        assert_eq!(probe(json!({"text": "Kochi"})).text.as_deref(), Some("Kochi"));
        assert!(serde_json::from_value::<Probe>(json!({"text": [1]})).is_err());
    }

    #[test]
    fn flags_from_form_strings() {
        assert_eq!(probe(json!({"flag": "1"})).flag, Some(true));
        assert_eq!(probe(json!({"flag": "false"})).flag, Some(false));
        assert_eq!(probe(json!({"flag": 0})).flag, Some(false));
        assert_eq!(probe(json!({"flag": "null"})).flag, None);
        assert!(serde_json::from_value::<Probe>(json!({"flag": "maybe"})).is_err());
    }

    #[test]
    fn ids_from_numbers_or_strings() {
        assert_eq!(probe(json!({"id": 7})).id, Some(7));
        assert_eq!(probe(json!({"id": " 12 "})).id, Some(12));
        assert!(serde_json::from_value::<Probe>(json!({"id": "abc"})).is_err());
    }

    #[test]
    fn dates_accept_timestamp_prefix() {
        assert_eq!(
            probe(json!({"date": "2026-03-01T10:00:00Z"})).date,
            NaiveDate::from_ymd_opt(2026, 3, 1)
        );
        assert!(serde_json::from_value::<Probe>(json!({"date": "01/03/2026"})).is_err());
    }

    #[test]
    fn value_lists_accept_encoded_strings() {
        assert_eq!(probe(json!({"values": [1, 2]})).values, Some(vec![json!(1), json!(2)]));
        assert_eq!(probe(json!({"values": "[3,4]"})).values, Some(vec![json!(3), json!(4)]));
        assert_eq!(probe(json!({"values": "5"})).values, Some(vec![json!(5)]));
        assert_eq!(probe(json!({"values": ""})).values, None);
    }

    #[test]
    fn id_lists_accept_several_shapes() {
        assert_eq!(probe(json!({"ids": [1, "2"]})).ids, Some(vec![1, 2]));
        assert_eq!(probe(json!({"ids": "[3, 4]"})).ids, Some(vec![3, 4]));
        assert_eq!(probe(json!({"ids": "5, 6"})).ids, Some(vec![5, 6]));
        assert_eq!(probe(json!({"ids": 9})).ids, Some(vec![9]));
    }

    #[test]
    fn json_lists_accept_array_or_string() {
        let expected = Some(vec![Entry { title: "A".into() }]);
        assert_eq!(probe(json!({"entries": [{"title": "A"}]})).entries, expected);
        assert_eq!(probe(json!({"entries": "[{\"title\":\"A\"}]"})).entries, expected);
        assert!(serde_json::from_value::<Probe>(json!({"entries": "{oops"})).is_err());
    }
}
