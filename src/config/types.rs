//! Core configuration types
//!
//! This module defines the data structures that represent an atbuild.yml package file.

use crate::config::value::ConfigMap;
use serde::Deserialize;
use std::collections::HashMap;

/// Top-level package file structure
#[derive(Debug, Clone, Deserialize)]
pub struct PackageFile {
    /// Package name, also used as the task prefix when this file is imported
    pub name: String,

    /// Overlays that are active unless the command line says otherwise
    #[serde(rename = "use-overlays", default)]
    pub use_overlays: Vec<String>,

    /// Package-wide overlays, applied to every task when active
    #[serde(default)]
    pub overlays: HashMap<String, ConfigMap>,

    /// Package files whose tasks are merged in under their package name
    #[serde(default)]
    pub imports: Vec<String>,

    /// Tasks defined in the package
    #[serde(default)]
    pub tasks: HashMap<String, TaskDecl>,
}

/// A task declaration as written in the package file
#[derive(Debug, Clone, Deserialize)]
pub struct TaskDecl {
    /// Name of the tool that runs this task
    pub tool: String,

    /// Tasks that must run first, in declaration order
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Task-specific overlays
    #[serde(default)]
    pub overlays: HashMap<String, ConfigMap>,

    /// Overlays active for this task only
    #[serde(rename = "use-overlays", default)]
    pub use_overlays: Vec<String>,

    /// Every other key: tool-specific options
    #[serde(flatten)]
    pub options: ConfigMap,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::value::ConfigValue;

    #[test]
    fn test_deserialize_simple_package() {
        let yaml = r#"
name: hello
tasks:
  default:
    tool: shell
    script: echo "hello"
"#;
        let package: PackageFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(package.name, "hello");
        assert_eq!(package.tasks.len(), 1);

        let task = package.tasks.get("default").unwrap();
        assert_eq!(task.tool, "shell");
        assert_eq!(
            task.options.get("script"),
            Some(&ConfigValue::from("echo \"hello\""))
        );
        assert!(task.dependencies.is_empty());
    }

    #[test]
    fn test_reserved_keys_are_not_options() {
        let yaml = r#"
name: app
use-overlays: [debug]
overlays:
  debug:
    compileOptions: [-g]
tasks:
  build:
    tool: atllbuild
    dependencies: [lib, codegen]
    use-overlays: [strict]
    overlays:
      strict:
        compileOptions: [-warnings-as-errors]
    name: app
    outputType: executable
"#;
        let package: PackageFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(package.use_overlays, vec!["debug"]);
        assert!(package.overlays.contains_key("debug"));

        let task = package.tasks.get("build").unwrap();
        assert_eq!(task.dependencies, vec!["lib", "codegen"]);
        assert_eq!(task.use_overlays, vec!["strict"]);
        assert!(task.overlays.contains_key("strict"));
        assert!(!task.options.contains_key("dependencies"));
        assert!(!task.options.contains_key("tool"));
        assert_eq!(task.options.len(), 2);
    }

    #[test]
    fn test_task_without_tool_is_rejected() {
        let yaml = r#"
name: broken
tasks:
  build:
    script: make
"#;
        let result: Result<PackageFile, _> = serde_yaml::from_str(yaml);
        assert!(result.is_err());
    }
}
