//! Search term handling for list endpoints.

use crate::normalize;

/// Trimmed search term, or `None` when the caller asked for no filter.
pub fn term(raw: Option<&str>) -> Option<String> {
    let trimmed = normalize::text_ref(raw)?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Build an `ILIKE` substring pattern, escaping `\`, `%` and `_`.
pub fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_sentinel_terms_mean_no_filter() {
        assert_eq!(term(None), None);
        assert_eq!(term(Some("")), None);
        assert_eq!(term(Some("   ")), None);
        assert_eq!(term(Some("undefined")), None);
        assert_eq!(term(Some(" acme ")), Some("acme".into()));
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(like_pattern("acme"), "%acme%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }
}
