//! Task dispatch

use crate::error::{ExecutionError, Result};
use crate::runner::platform::{user_path, Platform, PACKAGE_VAR, PLATFORM_VAR, USER_PATH_VAR};
use crate::runner::{Context, Package, Task};
use crate::tools::{Tool, ToolRegistry};
use std::env;
use tracing::debug;

/// Runs a task and everything it depends on
pub struct TaskRunner {
    registry: ToolRegistry,
}

impl TaskRunner {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Run `name` from `package` after its dependencies.
    ///
    /// The graph is built and every tool resolved before the first task runs,
    /// so configuration errors never follow side effects. The first failing
    /// task stops the run.
    pub fn run(&self, package: &Package, name: &str, ctx: &mut Context) -> Result<()> {
        let requested = package.require_task(name)?;
        let graph = package.pruned_dependency_graph(requested)?;
        debug!(
            "Graph for {}: {:?}",
            name,
            graph.iter().map(|t| t.name.as_str()).collect::<Vec<_>>()
        );

        let mut plan = Vec::with_capacity(graph.len());
        for task in graph {
            plan.push((task, self.resolve(task)?));
        }

        self.export_environment(package, ctx);

        for (task, tool) in plan {
            ctx.print_task_start(&task.name, &task.tool);
            tool.run(task, ctx)?;
            ctx.print_task_complete(&task.name);
        }
        Ok(())
    }

    fn resolve(&self, task: &Task) -> Result<&dyn Tool> {
        self.registry.get(&task.tool).ok_or_else(|| {
            ExecutionError::UnknownTool {
                task: task.name.clone(),
                tool: task.tool.clone(),
            }
            .into()
        })
    }

    /// Publish the platform and user path to tools and their child processes
    fn export_environment(&self, package: &Package, ctx: &mut Context) {
        let platform = Platform::target().to_string();
        env::set_var(PLATFORM_VAR, &platform);
        ctx.set_var(PLATFORM_VAR, platform);

        if let Some(path) = user_path() {
            let path = path.display().to_string();
            env::set_var(USER_PATH_VAR, &path);
            ctx.set_var(USER_PATH_VAR, path);
        }

        ctx.set_var(PACKAGE_VAR, package.name.clone());
    }
}
