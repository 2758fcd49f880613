//! Runtime task model and registry
//!
//! This module contains the runtime representation of tasks and the
//! immutable registry the executor resolves names against.

use crate::config;
use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;

/// Runtime task representation
#[derive(Debug, Clone)]
pub struct Task {
    /// Task name
    pub name: String,

    /// Usage description
    pub usage: Option<String>,

    /// Longer description
    pub description: Option<String>,

    /// Whether this task is hidden from listings
    pub private: bool,

    /// Prerequisite task names, in declared order
    pub deps: Vec<String>,

    /// Steps to execute once every prerequisite succeeded
    pub steps: Vec<Step>,
}

impl Task {
    /// Create an empty task with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Task {
            name: name.into(),
            usage: None,
            description: None,
            private: false,
            deps: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Add a prerequisite
    pub fn dep(mut self, name: impl Into<String>) -> Self {
        self.deps.push(name.into());
        self
    }

    /// Add a shell command step
    pub fn command(mut self, exec: impl Into<String>) -> Self {
        self.steps.push(Step::Exec(Command::Simple(exec.into())));
        self
    }

    /// Add a removal step
    pub fn remove<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps
            .push(Step::Remove(patterns.into_iter().map(Into::into).collect()));
        self
    }

    /// Create a new task from configuration
    pub fn from_config(name: String, config: config::Task) -> Self {
        let mut steps = Vec::new();
        for run in config.run {
            match run {
                config::Run::SimpleCommand(cmd) => steps.push(Step::Exec(Command::Simple(cmd))),
                config::Run::Complex(item) => {
                    steps.extend(
                        item.command
                            .into_iter()
                            .map(|cmd| Step::Exec(Command::from_config(cmd))),
                    );
                    if !item.remove.is_empty() {
                        steps.push(Step::Remove(item.remove));
                    }
                }
            }
        }

        Task {
            name,
            usage: config.usage,
            description: config.description,
            private: config.private,
            deps: config.deps,
            steps,
        }
    }
}

/// A single unit of work inside a task
#[derive(Debug, Clone)]
pub enum Step {
    /// Run a command through the interpreter
    Exec(Command),

    /// Delete matching paths; absent paths are not an error
    Remove(Vec<String>),
}

/// Runtime representation of a command
#[derive(Debug, Clone)]
pub enum Command {
    /// Simple command string
    Simple(String),

    /// Complex command with options
    Complex {
        exec: String,
        print: String,
        quiet: bool,
        dir: Option<String>,
    },
}

impl Command {
    /// Create from config
    pub fn from_config(config: config::Command) -> Self {
        match config {
            config::Command::Simple(cmd) => Command::Simple(cmd),
            config::Command::Complex(detail) => Command::Complex {
                print: detail.print.clone().unwrap_or_else(|| detail.exec.clone()),
                exec: detail.exec,
                quiet: detail.quiet,
                dir: detail.dir,
            },
        }
    }

    /// Get the command to execute
    pub fn exec(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { exec, .. } => exec,
        }
    }

    /// Get what to print
    pub fn print(&self) -> &str {
        match self {
            Command::Simple(cmd) => cmd,
            Command::Complex { print, .. } => print,
        }
    }

    /// Check if this command is quiet
    pub fn is_quiet(&self) -> bool {
        match self {
            Command::Simple(_) => false,
            Command::Complex { quiet, .. } => *quiet,
        }
    }

    /// Get the working directory
    pub fn dir(&self) -> Option<&str> {
        match self {
            Command::Simple(_) => None,
            Command::Complex { dir, .. } => dir.as_deref(),
        }
    }
}

/// Immutable set of tasks, keyed by name, in declaration order
#[derive(Debug, Clone)]
pub struct Registry {
    tasks: Vec<Task>,
    index: HashMap<String, usize>,
    default: Option<String>,
}

impl Registry {
    /// Build a registry from tasks; names must be unique
    ///
    /// Prerequisites are not checked here, so a registry may reference
    /// unknown tasks or contain cycles. The executor reports both when it
    /// reaches them.
    pub fn from_tasks(tasks: Vec<Task>) -> ConfigResult<Self> {
        let mut index = HashMap::with_capacity(tasks.len());
        for (position, task) in tasks.iter().enumerate() {
            if index.insert(task.name.clone(), position).is_some() {
                return Err(ConfigError::DuplicateTask(task.name.clone()));
            }
        }

        Ok(Registry {
            tasks,
            index,
            default: None,
        })
    }

    /// Build a registry from a parsed task file
    pub fn from_config(config: &config::Config) -> ConfigResult<Self> {
        let tasks = config
            .tasks
            .iter()
            .map(|(name, task)| Task::from_config(name.to_string(), task.clone()))
            .collect();

        let registry = Self::from_tasks(tasks)?;
        match &config.default {
            Some(default) => registry.with_default(default),
            None => Ok(registry),
        }
    }

    /// Set the task run when none is named
    pub fn with_default(mut self, name: &str) -> ConfigResult<Self> {
        if !self.contains(name) {
            return Err(ConfigError::UnknownDefault(name.to_string()));
        }
        self.default = Some(name.to_string());
        Ok(self)
    }

    /// Task run when none is named: the explicit default, else the first declared
    pub fn default_task(&self) -> Option<&str> {
        self.default
            .as_deref()
            .or_else(|| self.tasks.first().map(|t| t.name.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.index.get(name).map(|&i| &self.tasks[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Tasks shown in listings and help
    pub fn public_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.private)
    }
}
