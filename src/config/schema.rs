//! Configuration validation
//!
//! This module checks a parsed task file before any command runs.

use crate::config::types::{Config, Run, Task};
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashSet;

/// Validate a complete configuration
pub fn validate_config(config: &Config) -> ConfigResult<()> {
    if config.tasks.is_empty() {
        return Err(ConfigError::Invalid("no tasks are defined".to_string()));
    }

    if let Some(interpreter) = &config.interpreter {
        if interpreter.is_empty() {
            return Err(ConfigError::Invalid(
                "interpreter must name at least one program".to_string(),
            ));
        }
    }

    if let Some(default) = &config.default {
        if !config.tasks.contains_key(default) {
            return Err(ConfigError::UnknownDefault(default.clone()));
        }
    }

    for (name, task) in config.tasks.iter() {
        validate_task(config, name, task)?;
    }

    detect_circular_task_dependencies(config)?;

    Ok(())
}

/// Validate a single task
pub fn validate_task(config: &Config, name: &str, task: &Task) -> ConfigResult<()> {
    for dep in &task.deps {
        if !config.tasks.contains_key(dep) {
            return Err(ConfigError::UnknownDependency {
                task: name.to_string(),
                dependency: dep.clone(),
            });
        }
    }

    for run in &task.run {
        match run {
            Run::SimpleCommand(cmd) if cmd.trim().is_empty() => {
                return Err(ConfigError::Invalid(format!(
                    "task '{}' has an empty command",
                    name
                )));
            }
            Run::Complex(item) if item.command.is_empty() && item.remove.is_empty() => {
                return Err(ConfigError::Invalid(format!(
                    "task '{}' has a run item with neither command nor remove",
                    name
                )));
            }
            _ => {}
        }
    }

    Ok(())
}

/// Detect circular dependencies between tasks
fn detect_circular_task_dependencies(config: &Config) -> ConfigResult<()> {
    let mut visited = HashSet::new();
    for task_name in config.tasks.names() {
        let mut stack = Vec::new();
        check_task_cycle(config, task_name, &mut visited, &mut stack)?;
    }
    Ok(())
}

/// Recursively check for cycles in task dependencies
fn check_task_cycle<'a>(
    config: &'a Config,
    task_name: &'a str,
    visited: &mut HashSet<&'a str>,
    stack: &mut Vec<&'a str>,
) -> ConfigResult<()> {
    if stack.contains(&task_name) {
        stack.push(task_name);
        return Err(ConfigError::CircularDependency(stack.join(" -> ")));
    }

    // Skip if already fully processed
    if visited.contains(task_name) {
        return Ok(());
    }

    let task = config
        .tasks
        .get(task_name)
        .ok_or_else(|| ConfigError::Invalid(format!("task '{}' is not defined", task_name)))?;

    stack.push(task_name);
    for dep in &task.deps {
        check_task_cycle(config, dep, visited, stack)?;
    }
    stack.pop();
    visited.insert(task_name);

    Ok(())
}
