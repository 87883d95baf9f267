//! Error types for atbuild

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for atbuild operations
pub type Result<T> = std::result::Result<T, AtbuildError>;

/// Exit status used when the process working directory cannot be entered or restored
pub const EXIT_WORKING_DIRECTORY: i32 = 42;

/// Exit status used for every other failure
pub const EXIT_FAILURE: i32 = 1;

/// Main error type for atbuild
#[derive(Error, Debug)]
pub enum AtbuildError {
    /// Configuration and graph errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("Execution error: {0}")]
    Execution(#[from] ExecutionError),

    /// Variable interpolation errors
    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl AtbuildError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AtbuildError::Execution(
                ExecutionError::EnterWorkingDirectory { .. }
                | ExecutionError::RestoreWorkingDirectory { .. },
            ) => EXIT_WORKING_DIRECTORY,
            _ => EXIT_FAILURE,
        }
    }
}

/// Package loading, validation and graph errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find package file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown task '{0}'")]
    InvalidTask(String),

    #[error("Task '{task}' depends on '{dependency}', which is not defined")]
    UnresolvedDependency { task: String, dependency: String },

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Task '{task}' is missing required field '{field}'")]
    MissingField { task: String, field: String },

    #[error("Task '{task}' has an invalid '{field}': {error}")]
    InvalidField {
        task: String,
        field: String,
        error: String,
    },

    #[error("Failed to import package '{path}': {error}")]
    ImportFile { path: PathBuf, error: String },

    #[error("Import cycle detected at '{0}'")]
    ImportCycle(PathBuf),
}

impl ConfigError {
    /// Create a missing field error
    pub fn missing(task: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            task: task.into(),
            field: field.into(),
        }
    }

    /// Create an invalid field error
    pub fn invalid_field(
        task: impl Into<String>,
        field: impl Into<String>,
        error: impl ToString,
    ) -> Self {
        Self::InvalidField {
            task: task.into(),
            field: field.into(),
            error: error.to_string(),
        }
    }
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task '{task}' uses unknown tool '{tool}'")]
    UnknownTool { task: String, tool: String },

    #[error("Script for task '{task}' failed with exit code {code:?}")]
    ScriptFailed { task: String, code: Option<i32> },

    #[error("Build tool failed with exit code {code:?}: {command}")]
    BuildToolFailed { command: String, code: Option<i32> },

    #[error("Failed to spawn '{program}': {error}")]
    Spawn { program: String, error: io::Error },

    #[error("Can not change working directory to '{path}': {error}")]
    EnterWorkingDirectory { path: PathBuf, error: io::Error },

    #[error("Can not revert to previous working directory '{path}': {error}")]
    RestoreWorkingDirectory { path: PathBuf, error: io::Error },

    #[error("I/O error at {path}: {error}")]
    Io { path: PathBuf, error: io::Error },
}

impl ExecutionError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            error,
        }
    }
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Recursive interpolation detected")]
    RecursiveInterpolation,
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_working_directory_errors_exit_42() {
        let err: AtbuildError = ExecutionError::RestoreWorkingDirectory {
            path: PathBuf::from("/tmp"),
            error: io::Error::new(io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert_eq!(err.exit_code(), 42);

        let err: AtbuildError = ExecutionError::EnterWorkingDirectory {
            path: PathBuf::from("/nope"),
            error: io::Error::new(io::ErrorKind::NotFound, "gone"),
        }
        .into();
        assert_eq!(err.exit_code(), EXIT_WORKING_DIRECTORY);
    }

    #[test]
    fn test_other_errors_exit_1() {
        let err: AtbuildError = ConfigError::InvalidTask("nope".to_string()).into();
        assert_eq!(err.exit_code(), 1);

        let err: AtbuildError = ExecutionError::ScriptFailed {
            task: "t".to_string(),
            code: Some(3),
        }
        .into();
        assert_eq!(err.exit_code(), EXIT_FAILURE);
    }

    #[test]
    fn test_unresolved_dependency_message_names_both_tasks() {
        let err = ConfigError::UnresolvedDependency {
            task: "app".to_string(),
            dependency: "lib".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'app'"));
        assert!(msg.contains("'lib'"));
    }
}
