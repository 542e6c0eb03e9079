//! Filter sets for paginated list endpoints.
//!
//! A [`FilterSet`] is the active set of query filters for one data list
//! (for example `status=paid&client=42`). It serializes deterministically:
//! keys are kept in lexicographic order, so the same logical filter set
//! always produces the same query pairs and the same cache-key fragment
//! regardless of insertion order.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// An ordered set of filter key/value pairs.
///
/// Backed by a `BTreeMap` so iteration order, query-pair order, and the
/// cache-key fragment are all deterministic.
///
/// # Example
///
/// ```
/// use lazyfeed_core::FilterSet;
///
/// let mut filters = FilterSet::new();
/// filters.set("status", "paid");
/// filters.set("client", "42");
///
/// // Lexicographic regardless of insertion order.
/// assert_eq!(filters.key_fragment(), "client=42&status=paid");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    entries: BTreeMap<String, String>,
}

impl FilterSet {
    /// Create an empty filter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a filter value, replacing any previous value for the key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Chained form of [`set`](Self::set) for building literals.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a filter value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Remove a filter by key, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    /// Merge another filter set into this one.
    ///
    /// Values from `other` win on key collisions. This is the semantics of
    /// a filter-bar change: the new selections override, untouched filters
    /// stay active.
    pub fn merge(&mut self, other: FilterSet) {
        self.entries.extend(other.entries);
    }

    /// Number of active filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` pairs in lexicographic key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The deterministic `k=v&k=v` fragment used in composite cache keys.
    ///
    /// Empty filter sets produce an empty string. Values are used verbatim;
    /// this fragment identifies cache entries, it is not a URL.
    pub fn key_fragment(&self) -> String {
        let mut out = String::new();
        for (i, (k, v)) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(k);
            out.push('=');
            out.push_str(v);
        }
        out
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "(no filters)")
        } else {
            write!(f, "{}", self.key_fragment())
        }
    }
}

impl FromIterator<(String, String)> for FilterSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_fragment_is_ordered() {
        let a = FilterSet::new().with("zeta", "1").with("alpha", "2");
        let b = FilterSet::new().with("alpha", "2").with("zeta", "1");

        assert_eq!(a.key_fragment(), "alpha=2&zeta=1");
        assert_eq!(a.key_fragment(), b.key_fragment());
    }

    #[test]
    fn test_empty_fragment() {
        assert_eq!(FilterSet::new().key_fragment(), "");
    }

    #[test]
    fn test_merge_overrides() {
        let mut base = FilterSet::new().with("status", "open").with("client", "7");
        base.merge(FilterSet::new().with("status", "paid"));

        assert_eq!(base.get("status"), Some("paid"));
        assert_eq!(base.get("client"), Some("7"));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_set_and_remove() {
        let mut filters = FilterSet::new();
        filters.set("month", "2025-06");
        assert_eq!(filters.get("month"), Some("2025-06"));

        assert_eq!(filters.remove("month"), Some("2025-06".to_string()));
        assert!(filters.is_empty());
    }

    #[test]
    fn test_serde_roundtrip_is_a_plain_map() {
        let filters = FilterSet::new().with("status", "paid");
        let json = serde_json::to_string(&filters).unwrap();
        assert_eq!(json, r#"{"status":"paid"}"#);
    }
}
