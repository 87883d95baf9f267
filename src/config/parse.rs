//! Package file parsing and discovery

use crate::config::types::PackageFile;
use crate::error::{AtbuildError, ConfigError, ConfigResult};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default package file names to search for
pub const PACKAGE_FILE_NAMES: &[&str] = &["atbuild.yml", "atbuild.yaml"];

/// A parsed package file together with everything it imports
#[derive(Debug, Clone)]
pub struct ParsedPackage {
    /// Canonical path of the package file
    pub path: PathBuf,

    /// Parsed contents
    pub file: PackageFile,

    /// Imported packages, in declaration order
    pub imports: Vec<ParsedPackage>,
}

impl ParsedPackage {
    /// Directory containing the package file
    pub fn root(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Find the package file by searching current and parent directories
pub fn find_package_file() -> ConfigResult<PathBuf> {
    find_package_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the package file starting from a specific directory
pub fn find_package_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in PACKAGE_FILE_NAMES {
            let package_path = current_dir.join(file_name);
            searched_paths.push(package_path.display().to_string());

            if package_path.is_file() {
                return Ok(package_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse package contents from a string
pub fn parse_package(yaml: &str) -> Result<PackageFile, AtbuildError> {
    let file: PackageFile = serde_yaml::from_str(yaml)?;
    Ok(file)
}

/// Parse a package file and, recursively, everything it imports
pub fn parse_package_file(path: &Path) -> Result<ParsedPackage, AtbuildError> {
    let mut stack = Vec::new();
    parse_with_imports(path, &mut stack)
}

/// Parse a package file with automatic discovery
pub fn parse_package_auto() -> Result<ParsedPackage, AtbuildError> {
    let path = find_package_file()?;
    parse_package_file(&path)
}

fn parse_with_imports(path: &Path, stack: &mut Vec<PathBuf>) -> Result<ParsedPackage, AtbuildError> {
    let importing = !stack.is_empty();
    let path = fs::canonicalize(path).map_err(|e| load_error(path, importing, e))?;

    if stack.contains(&path) {
        return Err(ConfigError::ImportCycle(path).into());
    }

    let contents = fs::read_to_string(&path).map_err(|e| load_error(&path, importing, e))?;
    let file = parse_package(&contents).map_err(|e| load_error(&path, importing, e))?;
    debug!("Parsed package '{}' from {}", file.name, path.display());

    let base_dir = path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf();

    stack.push(path.clone());
    let mut imports = Vec::with_capacity(file.imports.len());
    for import in &file.imports {
        imports.push(parse_with_imports(&base_dir.join(import), stack)?);
    }
    stack.pop();

    Ok(ParsedPackage {
        path,
        file,
        imports,
    })
}

fn load_error(path: &Path, importing: bool, error: impl ToString) -> ConfigError {
    if importing {
        ConfigError::ImportFile {
            path: path.to_path_buf(),
            error: error.to_string(),
        }
    } else {
        ConfigError::Invalid(format!("{}: {}", path.display(), error.to_string()))
    }
}
