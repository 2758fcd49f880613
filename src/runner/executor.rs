//! Task graph execution
//!
//! Prerequisites are resolved depth-first in declared order. A task runs at
//! most once per invocation, and the first failure aborts everything that
//! has not started yet.

use crate::error::{ExecutionError, ExecutionResult};
use crate::runner::{execute_command, execute_remove, CommandRunner, Context, Registry, Step};

/// Outcome of a successful top-level run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Tasks that completed, in the order they finished
    pub tasks: Vec<String>,

    /// Commands started (zero in dry-run mode)
    pub commands: usize,

    /// Paths deleted by removal steps
    pub removed: usize,
}

/// Runs tasks from a registry through a [`CommandRunner`]
pub struct Executor<'a, R: CommandRunner> {
    registry: &'a Registry,
    runner: R,
}

impl<'a, R: CommandRunner> Executor<'a, R> {
    pub fn new(registry: &'a Registry, runner: R) -> Self {
        Executor { registry, runner }
    }

    /// Access the runner, e.g. to inspect a recording fake
    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Run a task and everything it depends on
    ///
    /// `ctx` should be fresh for each top-level invocation; tasks it already
    /// lists as completed are not run again.
    pub fn run(&mut self, task_name: &str, ctx: &mut Context) -> ExecutionResult<RunReport> {
        if !self.registry.contains(task_name) {
            return Err(ExecutionError::UnknownTask(task_name.to_string()));
        }

        let mut report = RunReport::default();
        let result = self.visit(task_name, ctx, &mut report);
        if result.is_err() {
            ctx.print_error(&format!("Task '{}' aborted", task_name));
        }
        result.map(|()| report)
    }

    fn visit(
        &mut self,
        task_name: &str,
        ctx: &mut Context,
        report: &mut RunReport,
    ) -> ExecutionResult<()> {
        if ctx.is_completed(task_name) {
            ctx.print_task_skip(task_name, "already completed");
            return Ok(());
        }

        if ctx.is_task_in_stack(task_name) {
            return Err(ExecutionError::CyclicDependency(ctx.cycle_path(task_name)));
        }

        let registry = self.registry;
        let task = registry
            .get(task_name)
            .ok_or_else(|| ExecutionError::UnknownTask(task_name.to_string()))?;

        ctx.push_task(task.name.clone());

        for dep in &task.deps {
            if let Err(e) = self.visit(dep, ctx, report) {
                ctx.pop_task();
                return Err(e);
            }
        }

        ctx.print_task_start(&task.name);

        for step in &task.steps {
            let outcome = match step {
                Step::Exec(cmd) => execute_command(cmd, ctx, &mut self.runner).map(|()| {
                    if !ctx.dry_run {
                        report.commands += 1;
                    }
                }),
                Step::Remove(patterns) => {
                    execute_remove(patterns, ctx, &mut self.runner).map(|n| report.removed += n)
                }
            };

            if let Err(e) = outcome {
                ctx.pop_task();
                return Err(e);
            }
        }

        ctx.pop_task();
        ctx.mark_completed(&task.name);
        ctx.print_task_complete(&task.name);
        report.tasks.push(task.name.clone());

        Ok(())
    }
}
