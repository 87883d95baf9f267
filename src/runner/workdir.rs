//! Scoped change of the process working directory

use crate::error::{ExecutionError, ExecutionResult};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Switches the process into a directory and switches back when done.
///
/// Call [`WorkingDirGuard::restore`] to observe a failed restore; if the guard
/// is dropped instead (early return, panic) the restore is still attempted and
/// a failure is logged.
#[derive(Debug)]
#[must_use = "dropping the guard immediately restores the previous directory"]
pub struct WorkingDirGuard {
    previous: PathBuf,
    restored: bool,
}

impl WorkingDirGuard {
    /// Enter `path`, remembering the current directory
    pub fn enter(path: &Path) -> ExecutionResult<Self> {
        let previous = env::current_dir().map_err(|error| ExecutionError::EnterWorkingDirectory {
            path: path.to_path_buf(),
            error,
        })?;

        env::set_current_dir(path).map_err(|error| ExecutionError::EnterWorkingDirectory {
            path: path.to_path_buf(),
            error,
        })?;
        debug!("Entered {} (was {})", path.display(), previous.display());

        Ok(Self {
            previous,
            restored: false,
        })
    }

    /// The directory that will be restored
    pub fn previous(&self) -> &Path {
        &self.previous
    }

    /// Return to the previous directory
    pub fn restore(mut self) -> ExecutionResult<()> {
        self.restored = true;
        env::set_current_dir(&self.previous).map_err(|error| {
            ExecutionError::RestoreWorkingDirectory {
                path: self.previous.clone(),
                error,
            }
        })
    }
}

impl Drop for WorkingDirGuard {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = env::set_current_dir(&self.previous) {
            error!(
                "Can not revert to previous working directory '{}': {}",
                self.previous.display(),
                e
            );
        }
    }
}
