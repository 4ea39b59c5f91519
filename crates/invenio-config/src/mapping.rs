//! The application's configuration store.
//!
//! # Design
//! - A single ordered map mutated in place by each loading stage.
//! - Every entry remembers which stage wrote it last, so overrides can be audited.

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use serde::Serialize;
use serde_json::Value;

/// Plain key/value bag handed between providers and the store.
pub type ConfigValues = BTreeMap<String, Value>;

/// Loading stage that produced a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "stage", content = "name", rename_all = "snake_case")]
pub enum ConfigSource {
    /// Fallback value from the defaults stage.
    Default,
    /// Value contributed by a registered provider.
    Module(String),
    /// Value read from the instance-folder file.
    InstanceFile,
    /// Value read from a prefixed environment variable.
    Environment,
    /// Value passed explicitly to the application factory.
    Override,
}

impl Display for ConfigSource {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => formatter.write_str("default"),
            Self::Module(name) => write!(formatter, "module:{name}"),
            Self::InstanceFile => formatter.write_str("instance"),
            Self::Environment => formatter.write_str("env"),
            Self::Override => formatter.write_str("override"),
        }
    }
}

/// A stored value and its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigEntry {
    /// The configured value.
    pub value: Value,
    /// Stage that last wrote the value.
    pub source: ConfigSource,
}

/// Ordered configuration mapping; later writes replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigMap {
    entries: BTreeMap<String, ConfigEntry>,
}

impl ConfigMap {
    /// Create an empty mapping.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of configured keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is configured.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Value and provenance stored under `key`.
    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&ConfigEntry> {
        self.entries.get(key)
    }

    /// String value stored under `key`, if it is a string.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Boolean value stored under `key`, if it is a boolean.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    /// Store `value` under `key`, returning the value it replaced.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: Value,
        source: ConfigSource,
    ) -> Option<Value> {
        self.entries
            .insert(key.into(), ConfigEntry { value, source })
            .map(|previous| previous.value)
    }

    /// Store `value` only when `key` is absent. Returns `true` when it was stored.
    pub fn set_default(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(
            key,
            ConfigEntry {
                value,
                source: ConfigSource::Default,
            },
        );
        true
    }

    /// Write every pair from `values`, attributing them to `source`.
    pub fn update(&mut self, values: ConfigValues, source: &ConfigSource) {
        for (key, value) in values {
            self.insert(key, value, source.clone());
        }
    }

    /// Iterate over keys and entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    /// Plain JSON object of every key and value, without provenance.
    #[must_use]
    pub fn to_values(&self) -> Value {
        Value::Object(
            self.entries
                .iter()
                .map(|(key, entry)| (key.clone(), entry.value.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_replaces_value_and_provenance() {
        let mut config = ConfigMap::new();
        assert!(
            config
                .insert("DEBUG", json!(false), ConfigSource::InstanceFile)
                .is_none()
        );
        let previous = config.insert("DEBUG", json!(true), ConfigSource::Override);
        assert_eq!(previous, Some(json!(false)));
        assert_eq!(config.get_bool("DEBUG"), Some(true));
        assert_eq!(
            config.entry("DEBUG").map(|entry| &entry.source),
            Some(&ConfigSource::Override)
        );
    }

    #[test]
    fn set_default_never_overwrites() {
        let mut config = ConfigMap::new();
        config.insert("SECRET_KEY", json!("s3cr3t"), ConfigSource::Environment);
        assert!(!config.set_default("SECRET_KEY", json!("CHANGE_ME")));
        assert!(config.set_default("DEBUG", json!(false)));
        assert_eq!(config.get_str("SECRET_KEY"), Some("s3cr3t"));
        assert_eq!(
            config.entry("DEBUG").map(|entry| &entry.source),
            Some(&ConfigSource::Default)
        );
    }

    #[test]
    fn update_attributes_every_key() {
        let mut config = ConfigMap::new();
        let values = ConfigValues::from([
            ("A".to_string(), json!(1)),
            ("B".to_string(), json!("two")),
        ]);
        config.update(values, &ConfigSource::Module("records".to_string()));
        assert_eq!(config.len(), 2);
        assert!(
            config
                .iter()
                .all(|(_, entry)| entry.source == ConfigSource::Module("records".to_string()))
        );
        assert_eq!(config.to_values(), json!({"A": 1, "B": "two"}));
    }

    #[test]
    fn sources_render_for_humans_and_json() -> Result<(), serde_json::Error> {
        assert_eq!(
            ConfigSource::Module("theme".to_string()).to_string(),
            "module:theme"
        );
        assert_eq!(ConfigSource::Environment.to_string(), "env");
        assert_eq!(
            serde_json::to_value(ConfigSource::Module("theme".to_string()))?,
            json!({"stage": "module", "name": "theme"})
        );
        assert_eq!(
            serde_json::to_value(ConfigSource::Default)?,
            json!({"stage": "default"})
        );
        Ok(())
    }
}
