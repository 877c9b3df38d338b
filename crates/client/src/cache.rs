//! In-process response cache keyed by query keys.
//!
//! Entries are fresh for [`STALE_TIME`] after they were fetched. Keys are
//! hierarchical: invalidating `["companies"]` drops `["companies", "3"]`
//! as well.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde_json::Value;

/// How long a cached response is served without refetching.
pub const STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Hierarchical cache key, e.g. `["followup", "page=2"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(Vec<String>);

impl CacheKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Append one segment.
    pub fn child(&self, part: impl Into<String>) -> Self {
        let mut parts = self.0.clone();
        parts.push(part.into());
        Self(parts)
    }

    pub fn starts_with(&self, prefix: &CacheKey) -> bool {
        self.0.starts_with(&prefix.0)
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for CacheKey {
    fn from(part: &str) -> Self {
        Self(vec![part.to_string()])
    }
}

impl<const N: usize> From<[&str; N]> for CacheKey {
    fn from(parts: [&str; N]) -> Self {
        Self::new(parts)
    }
}

struct Entry {
    value: Value,
    fetched_at: Instant,
}

/// Shared cache of decoded response envelopes.
pub struct QueryCache {
    stale_time: Duration,
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(STALE_TIME)
    }
}

impl QueryCache {
    pub fn new(stale_time: Duration) -> Self {
        Self {
            stale_time,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The cached value for `key`, unless it has gone stale.
    pub fn fresh(&self, key: &CacheKey) -> Option<Value> {
        let entries = self.entries.lock().ok()?;
        entries
            .get(key)
            .filter(|e| e.fetched_at.elapsed() < self.stale_time)
            .map(|e| e.value.clone())
    }

    pub fn insert(&self, key: CacheKey, value: Value) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                key,
                Entry {
                    value,
                    fetched_at: Instant::now(),
                },
            );
        }
    }

    /// Drop every entry under `prefix`. Returns how many were removed.
    pub fn invalidate(&self, prefix: &CacheKey) -> usize {
        let Ok(mut entries) = self.entries.lock() else {
            return 0;
        };
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        let removed = before - entries.len();
        tracing::debug!(key = ?prefix.parts(), removed, "Cache invalidated");
        removed
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn entries_expire_after_the_stale_time() {
        let cache = QueryCache::new(Duration::ZERO);
        cache.insert("staff".into(), json!({ "x": 1 }));
        assert_eq!(cache.fresh(&"staff".into()), None);

        let cache = QueryCache::default();
        cache.insert("staff".into(), json!({ "x": 1 }));
        assert_eq!(cache.fresh(&"staff".into()), Some(json!({ "x": 1 })));
    }

    #[test]
    fn invalidation_is_by_prefix() {
        let cache = QueryCache::default();
        let companies = CacheKey::from("companies");
        cache.insert(companies.clone(), json!(1));
        cache.insert(companies.child("3"), json!(2));
        cache.insert(CacheKey::from(["followup", "page=1"]), json!(3));

        assert_eq!(cache.invalidate(&companies), 2);
        assert_eq!(cache.fresh(&companies.child("3")), None);
        assert_eq!(
            cache.fresh(&CacheKey::from(["followup", "page=1"])),
            Some(json!(3))
        );
    }

    #[test]
    fn prefix_matches_whole_segments() {
        let key = CacheKey::from(["company-types"]);
        assert!(!key.starts_with(&CacheKey::from("company")));
        assert!(key.starts_with(&CacheKey::new(Vec::<String>::new())));
    }
}
