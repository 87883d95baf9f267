//! Pruned dependency graph
//!
//! Computes the tasks a requested task needs, in an order where every task
//! comes after all of its dependencies. The walk is depth-first and emits
//! tasks in post-order; siblings are visited in declaration order.

use crate::error::{ConfigError, ConfigResult};
use crate::runner::{Package, Task};
use std::collections::HashSet;

impl Package {
    /// The ordered, deduplicated set of tasks that must run for `task`
    pub fn pruned_dependency_graph<'a>(&'a self, task: &'a Task) -> ConfigResult<Vec<&'a Task>> {
        let mut walk = Walk {
            package: self,
            emitted: HashSet::new(),
            stack: Vec::new(),
            order: Vec::new(),
        };
        walk.visit(task)?;
        Ok(walk.order)
    }
}

struct Walk<'a> {
    package: &'a Package,
    emitted: HashSet<&'a str>,
    /// Tasks whose dependencies are still being visited
    stack: Vec<&'a str>,
    order: Vec<&'a Task>,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, task: &'a Task) -> ConfigResult<()> {
        if self.emitted.contains(task.name.as_str()) {
            return Ok(());
        }

        if let Some(start) = self.stack.iter().position(|name| *name == task.name) {
            let mut cycle: Vec<&str> = self.stack[start..].to_vec();
            cycle.push(&task.name);
            return Err(ConfigError::CircularDependency(cycle.join(" -> ")));
        }

        self.stack.push(&task.name);
        for dependency in &task.dependencies {
            let resolved = self.package.task(dependency).ok_or_else(|| {
                ConfigError::UnresolvedDependency {
                    task: task.name.clone(),
                    dependency: dependency.clone(),
                }
            })?;
            self.visit(resolved)?;
        }
        self.stack.pop();

        self.emitted.insert(&task.name);
        self.order.push(task);
        Ok(())
    }
}
