//! # Configuration
//!
//! A flat string key/value store. Keys are dotted (`fetch.retries`,
//! `http.port`); typed access happens on a [`AssetConfigSnapshot`].
//!
//! ```rust
//! use asset_core::AssetConfig;
//! let mut config = AssetConfig::new();
//!
//! config.set("fetch.retries", "4");
//! assert_eq!(config.snapshot().get_u32("fetch.retries"), Some(4));
//! ```
//!
//! Environment overrides use a prefix and double underscores as separators:
//!
//! ```bash
//! export ASSET__FETCH__RETRIES=8   # fetch.retries = 8
//! ```

use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
pub struct AssetConfig {
    values: HashMap<String, String>,
}

impl AssetConfig {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Set a key only if nothing has set it yet.
    pub fn set_default<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.entry(key.into()).or_insert_with(|| value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Apply every `{prefix}A__B=v` pair of `vars` as `a.b = v`.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                if !normalized.is_empty() {
                    self.set(normalized, value);
                }
            }
        }
    }

    /// [`load_vars`](Self::load_vars) over the process environment.
    pub fn load_env(&mut self, prefix: &str) {
        self.load_vars(prefix, std::env::vars());
    }

    pub fn snapshot(&self) -> AssetConfigSnapshot {
        AssetConfigSnapshot::new(self.values.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssetConfigSnapshot {
    map: HashMap<String, String>,
}

impl AssetConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| s.as_str())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.map.get(key).cloned()
    }

    pub fn get_u32(&self, key: &str) -> Option<u32> {
        self.get(key).and_then(|v| v.trim().parse::<u32>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.trim().parse::<usize>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixed_vars_become_dotted_keys() {
        let mut config = AssetConfig::new();
        config.load_vars(
            "ASSET__",
            vec![
                ("ASSET__FETCH__RETRIES".to_string(), "7".to_string()),
                ("ASSET__HTTP__PORT".to_string(), "9000".to_string()),
                ("OTHER__HTTP__PORT".to_string(), "1".to_string()),
            ],
        );

        let snap = config.snapshot();
        assert_eq!(snap.get_u32("fetch.retries"), Some(7));
        assert_eq!(snap.get("http.port"), Some("9000"));
        assert!(!config.has("other.http.port"));
    }

    #[test]
    fn defaults_do_not_override() {
        let mut config = AssetConfig::new();
        config.set("bundle.minify", "true");
        config.set_default("bundle.minify", "false");
        config.set_default("upload.retries", "4");

        let snap = config.snapshot();
        assert_eq!(snap.get_bool("bundle.minify"), Some(true));
        assert_eq!(snap.get_u32("upload.retries"), Some(4));
        assert_eq!(snap.get_u64("missing"), None);
    }
}
