//! Hand-off to the external incremental build executor

use crate::error::{ExecutionError, ExecutionResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Runs a manifest
pub trait BuildExecutor {
    /// Build everything `manifest` describes, from `working_dir`
    fn execute(&self, manifest: &Path, working_dir: &Path) -> ExecutionResult<()>;
}

/// Invokes `swift-build-tool -f <manifest>`
#[derive(Debug, Clone)]
pub struct LlbuildExecutor {
    program: PathBuf,
}

impl LlbuildExecutor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl BuildExecutor for LlbuildExecutor {
    fn execute(&self, manifest: &Path, working_dir: &Path) -> ExecutionResult<()> {
        let command_line = format!("{} -f {}", self.program.display(), manifest.display());
        debug!("Running {} in {}", command_line, working_dir.display());

        let status = Command::new(&self.program)
            .arg("-f")
            .arg(manifest)
            .current_dir(working_dir)
            .status()
            .map_err(|error| ExecutionError::Spawn {
                program: self.program.display().to_string(),
                error,
            })?;

        if !status.success() {
            return Err(ExecutionError::BuildToolFailed {
                command: command_line,
                code: status.code(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_missing_program_is_spawn_error() {
        let executor = LlbuildExecutor::new("/nonexistent/swift-build-tool");
        let result = executor.execute(Path::new("llbuild.yaml"), Path::new("/"));
        assert!(matches!(result, Err(ExecutionError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_non_zero_exit_is_fatal() {
        let executor = LlbuildExecutor::new("false");
        let result = executor.execute(Path::new("llbuild.yaml"), Path::new("/"));
        assert!(matches!(
            result,
            Err(ExecutionError::BuildToolFailed { code: Some(1), .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    #[serial]
    fn test_zero_exit_succeeds() {
        let executor = LlbuildExecutor::new("true");
        assert!(executor.execute(Path::new("llbuild.yaml"), Path::new("/")).is_ok());
    }
}
