//! Tools: the build actions tasks are dispatched to
//!
//! Every task names a tool. The [`ToolRegistry`] maps those names to
//! [`Tool`] implementations and is built once at startup.

pub mod atllbuild;
pub mod shell;
pub mod toolchain;

pub use atllbuild::AtllbuildTool;
pub use shell::ShellTool;
pub use toolchain::Toolchain;

use crate::error::Result;
use crate::runner::{Context, Task};
use std::collections::HashMap;

/// A build action that can run a task
pub trait Tool {
    /// Run `task`. Any error halts the whole build.
    fn run(&self, task: &Task, ctx: &Context) -> Result<()>;
}

/// Tools by name
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in tools: `shell` and `atllbuild`
    pub fn standard(toolchain: &Toolchain) -> Self {
        let mut registry = Self::new();
        registry.register(ShellTool::NAME, ShellTool);
        registry.register(AtllbuildTool::NAME, AtllbuildTool::new(toolchain.clone()));
        registry
    }

    /// Register a tool, replacing any tool of the same name
    pub fn register(&mut self, name: impl Into<String>, tool: impl Tool + 'static) {
        self.tools.insert(name.into(), Box::new(tool));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|tool| &**tool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Tool for Noop {
        fn run(&self, _task: &Task, _ctx: &Context) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_standard_registry() {
        let registry = ToolRegistry::standard(&Toolchain::default());
        assert!(registry.get("atllbuild").is_some());
        assert!(registry.get("shell").is_some());
        assert!(registry.get("make").is_none());
    }

    #[test]
    fn test_register_custom_tool() {
        let mut registry = ToolRegistry::new();
        registry.register("nop", Noop);

        let tool = registry.get("nop").unwrap();
        assert!(tool.run(&Task::new("t", "nop"), &Context::new()).is_ok());
    }
}
