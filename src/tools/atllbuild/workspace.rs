//! The atllbuild scratch directory
//!
//! ```text
//! .atllbuild/
//!   products/     accumulates across tasks and runs, never cleared
//!   objects/      cleared before every synthesis
//!   llbuildtmp/   cleared before every synthesis
//!   llbuild.yaml  default manifest location
//! ```

use crate::error::{ExecutionError, ExecutionResult};
use crate::tools::atllbuild::OutputType;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Scratch directory name, relative to the package root
pub const SCRATCH_DIR: &str = ".atllbuild";

/// Layout of a scratch directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The scratch directory of a package rooted at `package_root`
    pub fn for_package(package_root: &Path) -> Self {
        Self::new(package_root.join(SCRATCH_DIR))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn products_dir(&self) -> PathBuf {
        self.root.join("products")
    }

    pub fn objects_dir(&self) -> PathBuf {
        self.root.join("objects")
    }

    pub fn temps_dir(&self) -> PathBuf {
        self.root.join("llbuildtmp")
    }

    pub fn default_manifest_path(&self) -> PathBuf {
        self.root.join("llbuild.yaml")
    }

    /// `<objects>/<source file name>.o`
    pub fn object_path(&self, source: &Path) -> PathBuf {
        let mut name = source
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".o");
        self.objects_dir().join(name)
    }

    /// Final artifact of a module
    pub fn artifact_path(&self, module_name: &str, output_type: OutputType) -> PathBuf {
        match output_type {
            OutputType::Executable => self.products_dir().join(module_name),
            OutputType::StaticLibrary => self.products_dir().join(format!("{}.a", module_name)),
        }
    }

    /// Reset per-build intermediates and make sure every directory exists
    pub fn prepare(&self) -> ExecutionResult<()> {
        remove_dir_if_present(&self.objects_dir())?;
        remove_dir_if_present(&self.temps_dir())?;

        for dir in [self.root.clone(), self.products_dir(), self.objects_dir()] {
            fs::create_dir_all(&dir).map_err(|e| ExecutionError::io(&dir, e))?;
        }
        debug!("Prepared scratch directory {}", self.root.display());
        Ok(())
    }
}

fn remove_dir_if_present(dir: &Path) -> ExecutionResult<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ExecutionError::io(dir, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_paths() {
        let workspace = Workspace::new(".atllbuild");

        assert_eq!(
            workspace.object_path(Path::new("src/deep/main.swift")),
            PathBuf::from(".atllbuild/objects/main.swift.o")
        );
        assert_eq!(
            workspace.artifact_path("app", OutputType::Executable),
            PathBuf::from(".atllbuild/products/app")
        );
        assert_eq!(
            workspace.artifact_path("json", OutputType::StaticLibrary),
            PathBuf::from(".atllbuild/products/json.a")
        );
        assert_eq!(
            workspace.default_manifest_path(),
            PathBuf::from(".atllbuild/llbuild.yaml")
        );
    }

    #[test]
    fn test_prepare_creates_layout() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::for_package(temp_dir.path());

        workspace.prepare().unwrap();

        assert!(workspace.products_dir().is_dir());
        assert!(workspace.objects_dir().is_dir());
        assert!(!workspace.temps_dir().exists());
    }

    #[test]
    fn test_prepare_keeps_products_and_clears_objects() {
        let temp_dir = TempDir::new().unwrap();
        let workspace = Workspace::for_package(temp_dir.path());
        workspace.prepare().unwrap();

        let product = workspace.products_dir().join("json.a");
        let stale_object = workspace.objects_dir().join("old.swift.o");
        let stale_temp = workspace.temps_dir().join("scratch");
        fs::write(&product, "archive").unwrap();
        fs::write(&stale_object, "object").unwrap();
        fs::create_dir_all(workspace.temps_dir()).unwrap();
        fs::write(&stale_temp, "temp").unwrap();

        workspace.prepare().unwrap();

        assert!(product.exists());
        assert!(!stale_object.exists());
        assert!(workspace.objects_dir().is_dir());
        assert!(!stale_temp.exists());
    }
}
