//! Common test utilities

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory with an atbuild.yml file
pub fn create_test_package(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let package_path = temp_dir.path().join("atbuild.yml");
    fs::write(&package_path, content).unwrap();
    (temp_dir, package_path)
}

/// Write a file below `root`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, content).unwrap();
    path
}

/// Canonical form of a temporary directory, as the loader records it
pub fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap()
}
