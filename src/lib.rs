//! atbuild - a package-driven build orchestrator
//!
//! A package file names tasks, each bound to a tool. Running a task runs its
//! pruned dependency graph in order: shell scripts through the `shell` tool,
//! compile/link modules through the `atllbuild` tool, which synthesizes an
//! llbuild manifest and hands it to the incremental build executor.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod tools;
pub mod ui;

// Re-export commonly used types
pub use error::{AtbuildError, Result};

/// Current version of atbuild
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
