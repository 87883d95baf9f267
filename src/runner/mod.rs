//! Task execution engine
//!
//! This module materializes packages into tasks, orders them by dependency,
//! and dispatches each one to its tool.

pub mod context;
pub mod dispatch;
pub mod graph;
pub mod interpolate;
pub mod package;
pub mod platform;
pub mod task;
pub mod workdir;

// Re-export main types
pub use context::*;
pub use dispatch::*;
pub use interpolate::*;
pub use package::*;
pub use platform::*;
pub use task::*;
pub use workdir::*;
