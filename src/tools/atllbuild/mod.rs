//! The atllbuild tool
//!
//! Compiles and links one module. The task's options become an llbuild
//! manifest in the package's scratch directory, which the build executor
//! then runs incrementally.

pub mod executor;
pub mod manifest;
pub mod sources;
pub mod workspace;

pub use executor::{BuildExecutor, LlbuildExecutor};
pub use manifest::{synthesize, Manifest, ManifestRequest};
pub use sources::collect_sources;
pub use workspace::Workspace;

use crate::config::ConfigValue;
use crate::error::{ConfigError, ConfigResult, ExecutionError, Result};
use crate::runner::{Context, Task};
use crate::tools::{Tool, Toolchain};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

/// What the link phase produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputType {
    Executable,
    StaticLibrary,
}

impl FromStr for OutputType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "executable" => Ok(OutputType::Executable),
            "static-library" => Ok(OutputType::StaticLibrary),
            other => Err(format!(
                "unknown output type '{}', expected 'executable' or 'static-library'",
                other
            )),
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputType::Executable => write!(f, "executable"),
            OutputType::StaticLibrary => write!(f, "static-library"),
        }
    }
}

/// Options of an atllbuild task
#[derive(Debug, Clone, PartialEq)]
pub struct AtllbuildOptions {
    pub name: String,
    pub output_type: OutputType,
    pub source: Vec<String>,
    pub exclude_sources: Vec<String>,
    pub compile_options: Vec<String>,
    pub link_with_product: Vec<String>,
    pub link_sdk: bool,
    pub bootstrap_only: bool,
    pub llbuildyaml: Option<PathBuf>,
    pub swiftc_path: Option<PathBuf>,
}

impl AtllbuildOptions {
    pub fn from_task(task: &Task) -> ConfigResult<Self> {
        let name = task.required_string("name")?.to_string();
        let output_type = task
            .required_string("outputType")?
            .parse()
            .map_err(|e: String| ConfigError::invalid_field(&task.name, "outputType", e))?;
        let source = task
            .string_list("source")?
            .ok_or_else(|| ConfigError::missing(&task.name, "source"))?;

        Ok(Self {
            name,
            output_type,
            source,
            exclude_sources: task.string_list("excludeSources")?.unwrap_or_default(),
            compile_options: task.string_list("compileOptions")?.unwrap_or_default(),
            link_with_product: task.string_list("linkWithProduct")?.unwrap_or_default(),
            link_sdk: flag(task, "linkSDK", true)?,
            bootstrap_only: flag(task, "bootstrapOnly", false)?,
            llbuildyaml: optional_path(task, "llbuildyaml")?,
            swiftc_path: optional_path(task, "swiftCPath")?,
        })
    }
}

/// A boolean option; `"true"`/`"false"` strings are accepted too
fn flag(task: &Task, key: &str, default: bool) -> ConfigResult<bool> {
    match task.option(key) {
        None => Ok(default),
        Some(ConfigValue::Bool(value)) => Ok(*value),
        Some(ConfigValue::String(s)) if s == "true" => Ok(true),
        Some(ConfigValue::String(s)) if s == "false" => Ok(false),
        Some(other) => Err(ConfigError::invalid_field(
            &task.name,
            key,
            format!("expected a boolean, got {:?}", other),
        )),
    }
}

fn optional_path(task: &Task, key: &str) -> ConfigResult<Option<PathBuf>> {
    match task.option(key) {
        None => Ok(None),
        Some(ConfigValue::String(s)) => Ok(Some(PathBuf::from(s))),
        Some(other) => Err(ConfigError::invalid_field(
            &task.name,
            key,
            format!("expected a path, got {:?}", other),
        )),
    }
}

/// Compiles and links a module through a synthesized manifest
pub struct AtllbuildTool {
    toolchain: Toolchain,
    executor: Box<dyn BuildExecutor>,
}

impl AtllbuildTool {
    pub const NAME: &'static str = "atllbuild";

    /// A tool that hands manifests to the toolchain's build executor
    pub fn new(toolchain: Toolchain) -> Self {
        let executor = LlbuildExecutor::new(toolchain.build_tool.clone());
        Self {
            toolchain,
            executor: Box::new(executor),
        }
    }

    /// Replace the build executor
    pub fn with_executor(mut self, executor: impl BuildExecutor + 'static) -> Self {
        self.executor = Box::new(executor);
        self
    }

    /// Write the manifest for `task` and return where it went
    pub fn write_manifest(
        &self,
        task: &Task,
        options: &AtllbuildOptions,
        package_root: &Path,
    ) -> Result<PathBuf> {
        let sources = collect_sources(
            &task.name,
            &options.source,
            &options.exclude_sources,
            &task.imported_path,
        )?;

        let workspace = Workspace::for_package(package_root);
        workspace.prepare()?;

        let swiftc = options
            .swiftc_path
            .as_deref()
            .unwrap_or(&self.toolchain.swiftc);
        let sdk_path = if options.link_sdk {
            self.toolchain.sdk_path.as_deref()
        } else {
            None
        };

        let manifest = synthesize(&ManifestRequest {
            module_name: &options.name,
            sources: &sources,
            workspace: &workspace,
            output_type: options.output_type,
            compile_options: &options.compile_options,
            link_with_product: &options.link_with_product,
            sdk_path,
            swiftc,
        });
        let yaml = manifest.to_yaml()?;

        let path = match &options.llbuildyaml {
            Some(path) => package_root.join(path),
            None => workspace.default_manifest_path(),
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ExecutionError::io(parent, e))?;
        }
        fs::write(&path, yaml).map_err(|e| ExecutionError::io(&path, e))?;

        debug!(
            "Wrote manifest for {} ({} sources) to {}",
            options.name,
            sources.len(),
            path.display()
        );
        Ok(path)
    }
}

impl Tool for AtllbuildTool {
    fn run(&self, task: &Task, ctx: &Context) -> Result<()> {
        let options = AtllbuildOptions::from_task(task)?;
        let manifest = self.write_manifest(task, &options, &ctx.working_dir)?;

        if options.bootstrap_only {
            ctx.print_info(&format!("Wrote {}", manifest.display()));
            return Ok(());
        }

        ctx.print_debug(&format!("Building {} {}", options.output_type, options.name));
        self.executor.execute(&manifest, &ctx.working_dir)?;
        Ok(())
    }
}
