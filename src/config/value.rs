//! Dynamically-typed task configuration values
//!
//! Task options are deliberately schema-light: every tool reads the keys it
//! cares about through the typed accessors here and decides for itself whether
//! a missing or mistyped value is fatal.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// A task's option map
pub type ConfigMap = BTreeMap<String, ConfigValue>;

/// A single configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Bool(bool),
    List(Vec<ConfigValue>),
    Map(ConfigMap),
}

impl ConfigValue {
    /// Convert a YAML value, rejecting nulls and tagged values
    pub fn from_yaml(value: Value) -> Result<Self, String> {
        match value {
            Value::String(s) => Ok(ConfigValue::String(s)),
            Value::Bool(b) => Ok(ConfigValue::Bool(b)),
            Value::Number(n) => Ok(ConfigValue::String(n.to_string())),
            Value::Sequence(seq) => seq
                .into_iter()
                .map(ConfigValue::from_yaml)
                .collect::<Result<Vec<_>, _>>()
                .map(ConfigValue::List),
            Value::Mapping(mapping) => {
                let mut map = ConfigMap::new();
                for (key, value) in mapping {
                    let key = match key {
                        Value::String(s) => s,
                        Value::Number(n) => n.to_string(),
                        Value::Bool(b) => b.to_string(),
                        other => return Err(format!("unsupported mapping key {:?}", other)),
                    };
                    let value = ConfigValue::from_yaml(value)
                        .map_err(|e| format!("{}: {}", key, e))?;
                    map.insert(key, value);
                }
                Ok(ConfigValue::Map(map))
            }
            Value::Null => Err("null values are not allowed".to_string()),
            Value::Tagged(tagged) => Err(format!("tagged value {} is not allowed", tagged.tag)),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ConfigValue]> {
        match self {
            ConfigValue::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ConfigMap> {
        match self {
            ConfigValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when this value is a map
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.as_map().and_then(|map| map.get(key))
    }

    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ConfigValue::as_str)
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ConfigValue::as_bool)
    }

    pub fn list(&self, key: &str) -> Option<&[ConfigValue]> {
        self.get(key).and_then(ConfigValue::as_list)
    }

    pub fn map(&self, key: &str) -> Option<&ConfigMap> {
        self.get(key).and_then(ConfigValue::as_map)
    }

    /// Project a list of strings.
    ///
    /// Returns `None` when the key is absent or not a list, and `Some(Err(item))`
    /// with the first non-string member so callers can report it.
    pub fn string_list(&self, key: &str) -> Option<Result<Vec<String>, ConfigValue>> {
        self.list(key).map(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string).ok_or_else(|| item.clone()))
                .collect()
        })
    }

    /// Merge an overlay into this value.
    ///
    /// Lists are appended, maps are merged key by key, and any other
    /// combination is replaced by the overlay.
    pub fn merge(&mut self, overlay: &ConfigValue) {
        match (self, overlay) {
            (ConfigValue::List(base), ConfigValue::List(extra)) => {
                base.extend(extra.iter().cloned());
            }
            (ConfigValue::Map(base), ConfigValue::Map(extra)) => merge_maps(base, extra),
            (base, overlay) => *base = overlay.clone(),
        }
    }
}

/// Merge `overlay` into `base` using [`ConfigValue::merge`] per key
pub fn merge_maps(base: &mut ConfigMap, overlay: &ConfigMap) {
    for (key, value) in overlay {
        match base.get_mut(key) {
            Some(existing) => existing.merge(value),
            None => {
                base.insert(key.clone(), value.clone());
            }
        }
    }
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let value = Value::deserialize(deserializer)?;
        ConfigValue::from_yaml(value).map_err(D::Error::custom)
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::String(s)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Bool(b)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        ConfigValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<ConfigMap> for ConfigValue {
    fn from(map: ConfigMap) -> Self {
        ConfigValue::Map(map)
    }
}
