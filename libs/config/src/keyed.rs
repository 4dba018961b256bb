//! Lookup tables with an explicit default
//!
//! Used for settings that may be tuned per key (typically per timeframe) but
//! always resolve to a value.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// A mapping from `K` to `V` that falls back to `default` for absent keys.
///
/// In TOML:
///
/// ```toml
/// [signal.targets]
/// default = [1.0, 1.5, 2.0]
/// [signal.targets.overrides]
/// "1d" = [1.0, 2.0, 3.0]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize + Eq + Hash, V: Serialize",
    deserialize = "K: Deserialize<'de> + Eq + Hash, V: Deserialize<'de>"
))]
pub struct KeyedDefault<K, V> {
    pub default: V,
    #[serde(default)]
    pub overrides: HashMap<K, V>,
}

impl<K: Eq + Hash, V: PartialEq> PartialEq for KeyedDefault<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.default == other.default && self.overrides == other.overrides
    }
}

impl<K: Eq + Hash, V> KeyedDefault<K, V> {
    pub fn new(default: V) -> Self {
        Self {
            default,
            overrides: HashMap::new(),
        }
    }

    pub fn with_override(mut self, key: K, value: V) -> Self {
        self.overrides.insert(key, value);
        self
    }

    /// Value for `key`, or the default when no override exists
    pub fn resolve(&self, key: &K) -> &V {
        self.overrides.get(key).unwrap_or(&self.default)
    }

    /// Default first, then every override
    pub fn values(&self) -> impl Iterator<Item = &V> {
        std::iter::once(&self.default).chain(self.overrides.values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_falls_back_to_default() {
        let table = KeyedDefault::new(0.5).with_override("1d", 0.9);
        assert_eq!(*table.resolve(&"1d"), 0.9);
        assert_eq!(*table.resolve(&"5m"), 0.5);
    }

    #[test]
    fn test_values_include_default_and_overrides() {
        let table = KeyedDefault::new(1).with_override("a", 2).with_override("b", 3);
        let mut all: Vec<i32> = table.values().copied().collect();
        all.sort();
        assert_eq!(all, vec![1, 2, 3]);
    }

    #[test]
    fn test_deserialize_without_overrides() {
        let table: KeyedDefault<String, Vec<f64>> =
            serde_json::from_str(r#"{"default": [1.0, 2.0]}"#).unwrap();
        assert!(table.overrides.is_empty());
        assert_eq!(table.resolve(&"1h".to_string()), &vec![1.0, 2.0]);
    }
}
