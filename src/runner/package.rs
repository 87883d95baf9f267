//! Package materialization
//!
//! Turns a parsed package file (and its imports) into runtime tasks, merging
//! active overlays into each task's options along the way.

use crate::config::{
    merge_maps, parse_package_auto, parse_package_file, validate_package, ParsedPackage,
    IMPORT_SEPARATOR,
};
use crate::error::{ConfigError, ConfigResult, Result};
use crate::runner::Task;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The default task run when none is named
pub const DEFAULT_TASK: &str = "default";

/// A loaded package: every task it defines or imports
#[derive(Debug, Clone)]
pub struct Package {
    /// Display name
    pub name: String,

    /// Directory containing the package file
    pub root: PathBuf,

    /// Tasks by fully qualified name
    pub tasks: HashMap<String, Task>,
}

impl Package {
    /// Create an empty package
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            tasks: HashMap::new(),
        }
    }

    /// Add a task, replacing any task of the same name
    pub fn add_task(&mut self, task: Task) {
        self.tasks.insert(task.name.clone(), task);
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.add_task(task);
        self
    }

    /// Load a package file with the given command-line overlays
    pub fn load(path: &Path, overlays: &[String]) -> Result<Self> {
        let parsed = parse_package_file(path)?;
        Ok(Self::from_parsed(&parsed, overlays)?)
    }

    /// Discover the package file from the current directory and load it
    pub fn discover(overlays: &[String]) -> Result<Self> {
        let parsed = parse_package_auto()?;
        Ok(Self::from_parsed(&parsed, overlays)?)
    }

    /// Materialize tasks from a parsed package
    pub fn from_parsed(parsed: &ParsedPackage, overlays: &[String]) -> ConfigResult<Self> {
        validate_package(parsed)?;

        let mut package = Package::new(parsed.file.name.clone(), parsed.root());
        let mut defined = BTreeSet::new();
        let mut requested: BTreeSet<String> = overlays.iter().cloned().collect();

        package.add_tasks(parsed, "", overlays, &mut defined, &mut requested);

        for name in requested.difference(&defined) {
            warn!("Overlay '{}' is not defined by any task or package", name);
        }
        debug!(
            "Loaded package '{}' with {} tasks",
            package.name,
            package.tasks.len()
        );

        Ok(package)
    }

    fn add_tasks(
        &mut self,
        parsed: &ParsedPackage,
        prefix: &str,
        overlays: &[String],
        defined: &mut BTreeSet<String>,
        requested: &mut BTreeSet<String>,
    ) {
        let file = &parsed.file;
        let package_overlays = union(overlays, &file.use_overlays);
        defined.extend(file.overlays.keys().cloned());

        for (name, decl) in &file.tasks {
            defined.extend(decl.overlays.keys().cloned());
            let active = union(&package_overlays, &decl.use_overlays);

            let mut config = decl.options.clone();
            for overlay in &active {
                requested.insert(overlay.clone());
                if let Some(values) = file.overlays.get(overlay) {
                    merge_maps(&mut config, values);
                }
                if let Some(values) = decl.overlays.get(overlay) {
                    merge_maps(&mut config, values);
                }
            }

            let task = Task::new(format!("{}{}", prefix, name), decl.tool.clone())
                .with_config(config)
                .with_dependencies(
                    decl.dependencies
                        .iter()
                        .map(|dep| format!("{}{}", prefix, dep))
                        .collect(),
                )
                .with_imported_path(parsed.root());
            self.add_task(task);
        }

        for import in &parsed.imports {
            let prefix = format!("{}{}{}", prefix, import.file.name, IMPORT_SEPARATOR);
            self.add_tasks(import, &prefix, overlays, defined, requested);
        }
    }

    /// Look up a task by name
    pub fn task(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    /// Look up a task, failing with `InvalidTask`
    pub fn require_task(&self, name: &str) -> ConfigResult<&Task> {
        self.task(name)
            .ok_or_else(|| ConfigError::InvalidTask(name.to_string()))
    }

    /// Task names in lexical order
    pub fn task_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tasks.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

/// Concatenate two overlay lists, keeping the first occurrence of each name
fn union(first: &[String], second: &[String]) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(first.len() + second.len());
    for name in first.iter().chain(second) {
        if !result.contains(name) {
            result.push(name.clone());
        }
    }
    result
}
