//! Runtime task representation

use crate::config::{ConfigMap, ConfigValue};
use crate::error::{ConfigError, ConfigResult};
use std::path::PathBuf;

/// A materialized task
///
/// Overlays have already been merged into `config`; the task is read-only
/// for the rest of the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    /// Fully qualified task name (imported tasks carry their package prefix)
    pub name: String,

    /// Name of the tool that runs this task
    pub tool: String,

    /// Tool-specific options, always a map
    pub config: ConfigValue,

    /// Tasks that must run first, in declaration order
    pub dependencies: Vec<String>,

    /// Directory the task runs relative to
    pub imported_path: PathBuf,
}

impl Task {
    /// Create a task with no options and no dependencies
    pub fn new(name: impl Into<String>, tool: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tool: tool.into(),
            config: ConfigValue::Map(ConfigMap::new()),
            dependencies: Vec::new(),
            imported_path: PathBuf::from("."),
        }
    }

    pub fn with_config(mut self, config: ConfigMap) -> Self {
        self.config = ConfigValue::Map(config);
        self
    }

    /// Set a single option
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        if let ConfigValue::Map(map) = &mut self.config {
            map.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_dependencies<S: Into<String>>(mut self, dependencies: Vec<S>) -> Self {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_imported_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.imported_path = path.into();
        self
    }

    /// Look up a raw option
    pub fn option(&self, key: &str) -> Option<&ConfigValue> {
        self.config.get(key)
    }

    /// A string option that must be present
    pub fn required_string(&self, key: &str) -> ConfigResult<&str> {
        self.config
            .string(key)
            .ok_or_else(|| ConfigError::missing(&self.name, key))
    }

    /// A list-of-strings option.
    ///
    /// Absent yields `Ok(None)`; a value that is not a list of strings is an error.
    pub fn string_list(&self, key: &str) -> ConfigResult<Option<Vec<String>>> {
        match self.option(key) {
            None => Ok(None),
            Some(_) => match self.config.string_list(key) {
                Some(Ok(items)) => Ok(Some(items)),
                Some(Err(item)) => Err(ConfigError::invalid_field(
                    &self.name,
                    key,
                    format!("{:?} is not a string", item),
                )),
                None => Err(ConfigError::invalid_field(&self.name, key, "expected a list")),
            },
        }
    }
}
