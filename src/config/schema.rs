//! Package validation
//!
//! Structural checks that can be made before any task is materialized.
//! Dependency resolution and cycle detection happen later, when a task
//! graph is requested, so a broken task only fails the builds that need it.

use crate::config::parse::ParsedPackage;
use crate::config::types::{PackageFile, TaskDecl};
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Separator between an imported package's name and its task names
pub const IMPORT_SEPARATOR: char = '.';

/// Validate a parsed package and everything it imports
pub fn validate_package(package: &ParsedPackage) -> ConfigResult<()> {
    validate_package_file(&package.file)?;

    let mut import_names = HashSet::new();
    for import in &package.imports {
        if !import_names.insert(import.file.name.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "Package '{}' imports more than one package named '{}'",
                package.file.name, import.file.name
            )));
        }
        validate_package(import)?;
    }

    Ok(())
}

/// Validate a single package file
pub fn validate_package_file(file: &PackageFile) -> ConfigResult<()> {
    validate_name("Package", &file.name)?;

    for (name, task) in &file.tasks {
        validate_name("Task", name)?;
        validate_task(name, task)?;
    }

    Ok(())
}

/// Validate a single task declaration
pub fn validate_task(name: &str, task: &TaskDecl) -> ConfigResult<()> {
    if task.tool.trim().is_empty() {
        return Err(ConfigError::missing(name, "tool"));
    }

    if let Some(dep) = task.dependencies.iter().find(|d| d.trim().is_empty()) {
        return Err(ConfigError::invalid_field(
            name,
            "dependencies",
            format!("empty dependency name {:?}", dep),
        ));
    }

    Ok(())
}

fn validate_name(kind: &str, name: &str) -> ConfigResult<()> {
    if name.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{} name must not be empty", kind)));
    }
    if name.contains(IMPORT_SEPARATOR) {
        return Err(ConfigError::Invalid(format!(
            "{} name '{}' must not contain '{}'",
            kind, name, IMPORT_SEPARATOR
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse::parse_package;
    use std::path::PathBuf;

    fn parsed(yaml: &str) -> ParsedPackage {
        ParsedPackage {
            path: PathBuf::from("/project/atbuild.yml"),
            file: parse_package(yaml).unwrap(),
            imports: Vec::new(),
        }
    }

    #[test]
    fn test_validate_valid_package() {
        let package = parsed(
            r#"
name: app
tasks:
  default:
    tool: shell
    dependencies: [lib]
    script: make
  lib:
    tool: shell
    script: make lib
"#,
        );
        assert!(validate_package(&package).is_ok());
    }

    #[test]
    fn test_validate_empty_tool() {
        let package = parsed("name: app\ntasks:\n  build:\n    tool: ''\n");
        assert!(matches!(
            validate_package(&package),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_validate_dotted_task_name() {
        let package = parsed("name: app\ntasks:\n  json.lib:\n    tool: shell\n");
        assert!(matches!(
            validate_package(&package),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_validate_empty_dependency() {
        let package = parsed("name: app\ntasks:\n  build:\n    tool: shell\n    dependencies: ['']\n");
        assert!(matches!(
            validate_package(&package),
            Err(ConfigError::InvalidField { .. })
        ));
    }

    #[test]
    fn test_validate_duplicate_import_names() {
        let mut package = parsed("name: app\n");
        package.imports.push(parsed("name: json\n"));
        package.imports.push(parsed("name: json\n"));

        assert!(matches!(
            validate_package(&package),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_unresolved_dependency_is_not_a_load_error() {
        let package = parsed("name: app\ntasks:\n  build:\n    tool: shell\n    dependencies: [ghost]\n");
        assert!(validate_package(&package).is_ok());
    }
}
