//! Core configuration types
//!
//! This module defines the data structures that represent an rmk.yml task file.

use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;

/// Top-level configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Application name (optional)
    #[serde(default)]
    pub name: Option<String>,

    /// Application usage description (optional)
    #[serde(default)]
    pub usage: Option<String>,

    /// Task to run when none is named (defaults to the first declared task)
    #[serde(default)]
    pub default: Option<String>,

    /// Global interpreter to use for commands (e.g., ["sh", "-c"])
    #[serde(default)]
    pub interpreter: Option<Vec<String>>,

    /// Variables available to every command as `${name}` and as environment
    #[serde(default)]
    pub vars: HashMap<String, String>,

    /// Dotenv file to load, relative to the task file
    #[serde(rename = "env-file", default)]
    pub env_file: Option<String>,

    /// Tasks defined in the configuration, in declaration order
    #[serde(default)]
    pub tasks: TaskMap,
}

/// A task definition
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Task {
    /// Usage description for help text
    #[serde(default)]
    pub usage: Option<String>,

    /// Longer description for help text
    #[serde(default)]
    pub description: Option<String>,

    /// Whether this task is private (hidden from help and listings)
    #[serde(default)]
    pub private: bool,

    /// Tasks that must complete before this one runs
    #[serde(default, alias = "prerequisites", deserialize_with = "deserialize_names")]
    pub deps: Vec<String>,

    /// Run items to execute
    #[serde(default, deserialize_with = "deserialize_run_items")]
    pub run: Vec<Run>,
}

/// A run item - either a bare command or a structured step
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Run {
    /// Simple string command
    SimpleCommand(String),

    /// Structured run item
    Complex(RunItem),
}

/// A structured run item
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunItem {
    /// Commands to execute
    #[serde(default, deserialize_with = "deserialize_commands")]
    pub command: Vec<Command>,

    /// Paths or glob patterns to delete, relative to the working directory
    #[serde(default, deserialize_with = "deserialize_names")]
    pub remove: Vec<String>,
}

/// A command to execute
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Simple string command
    Simple(String),

    /// Complex command with additional options
    Complex(CommandDetail),
}

/// Detailed command specification
#[derive(Debug, Clone, Deserialize)]
pub struct CommandDetail {
    /// The command to execute
    pub exec: String,

    /// What to print when running (defaults to exec)
    pub print: Option<String>,

    /// Whether to suppress the `[RUN]` line
    #[serde(default)]
    pub quiet: bool,

    /// Working directory for the command
    pub dir: Option<String>,
}

/// Tasks keyed by name, preserving declaration order
///
/// Deserialization rejects a name that appears twice instead of letting the
/// later definition silently win.
#[derive(Debug, Clone, Default)]
pub struct TaskMap {
    entries: Vec<(String, Task)>,
}

impl TaskMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a task, replacing (in place) any task with the same name
    ///
    /// Returns the replaced task, if any.
    pub fn insert(&mut self, name: impl Into<String>, task: Task) -> Option<Task> {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, task)),
            None => {
                self.entries.push((name, task));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, t)| t)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Task)> {
        self.entries.iter().map(|(n, t)| (n.as_str(), t))
    }
}

impl IntoIterator for TaskMap {
    type Item = (String, Task);
    type IntoIter = std::vec::IntoIter<(String, Task)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'de> Deserialize<'de> for TaskMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TaskMapVisitor;

        impl<'de> Visitor<'de> for TaskMapVisitor {
            type Value = TaskMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of task names to task definitions")
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<TaskMap, E> {
                Ok(TaskMap::new())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TaskMap, A::Error> {
                use serde::de::Error;

                let mut tasks = TaskMap::new();
                while let Some((name, task)) = access.next_entry::<String, Task>()? {
                    if tasks.insert(name.clone(), task).is_some() {
                        return Err(A::Error::custom(format!(
                            "task '{}' is defined more than once",
                            name
                        )));
                    }
                }
                Ok(tasks)
            }
        }

        deserializer.deserialize_any(TaskMapVisitor)
    }
}

/// Accept either a single value or a list of values
fn deserialize_one_or_many<'de, D, T>(deserializer: D, field: &str) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    use serde::de::Error;
    use serde_yaml::Value;

    let value = Value::deserialize(deserializer)?;

    match value {
        Value::String(_) | Value::Mapping(_) => {
            let item = T::deserialize(value).map_err(D::Error::custom)?;
            Ok(vec![item])
        }
        Value::Sequence(seq) => seq
            .into_iter()
            .map(|item| T::deserialize(item).map_err(D::Error::custom))
            .collect(),
        Value::Null => Ok(Vec::new()),
        _ => Err(D::Error::custom(format!(
            "{} must be a string, object, or array",
            field
        ))),
    }
}

fn deserialize_run_items<'de, D>(deserializer: D) -> Result<Vec<Run>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_one_or_many(deserializer, "run")
}

fn deserialize_commands<'de, D>(deserializer: D) -> Result<Vec<Command>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_one_or_many(deserializer, "command")
}

fn deserialize_names<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_one_or_many(deserializer, "list")
}
