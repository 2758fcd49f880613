//! Error types for rmk

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Exit code used when the requested task is not in the registry
pub const UNKNOWN_TASK_EXIT_CODE: i32 = 64;

/// Exit code reported by shells when a command cannot be found
pub const MISSING_TOOL_EXIT_CODE: i32 = 127;

/// Result type alias for rmk operations
pub type Result<T> = std::result::Result<T, RmkError>;

/// Main error type for rmk
#[derive(Error, Debug)]
pub enum RmkError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Task execution errors
    #[error("{0}")]
    Execution(#[from] ExecutionError),

    /// YAML parsing errors
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl RmkError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            RmkError::Execution(err) => err.exit_code(),
            _ => 1,
        }
    }
}

/// Task file parsing and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to find task file (searched: {0})")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Task '{0}' is defined more than once")]
    DuplicateTask(String),

    #[error("Task '{task}' depends on undefined task '{dependency}'")]
    UnknownDependency { task: String, dependency: String },

    #[error("Default task '{0}' is not defined")]
    UnknownDefault(String),

    #[error("Circular dependency detected: {0}")]
    CircularDependency(String),

    #[error("Failed to load env file '{path}': {error}")]
    EnvFile { path: PathBuf, error: String },
}

/// Task execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Task '{0}' is not defined")]
    UnknownTask(String),

    #[error("Command `{command}` failed with exit code {code}")]
    CommandFailed { command: String, code: i32 },

    #[error("Command `{command}` could not be started: tool not found")]
    MissingTool { command: String },

    #[error("Circular dependency detected: {0}")]
    CyclicDependency(String),

    #[error("Failed to remove '{}': {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("Invalid removal pattern '{pattern}': {error}")]
    InvalidPattern { pattern: String, error: String },

    #[error("Interpolation error: {0}")]
    Interpolation(#[from] InterpolationError),
}

impl ExecutionError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ExecutionError::UnknownTask(_) => UNKNOWN_TASK_EXIT_CODE,
            ExecutionError::CommandFailed { code, .. } => *code,
            ExecutionError::MissingTool { .. } => MISSING_TOOL_EXIT_CODE,
            _ => 1,
        }
    }
}

/// Variable interpolation errors
#[derive(Error, Debug)]
pub enum InterpolationError {
    #[error("Recursive interpolation detected in '{0}'")]
    RecursiveInterpolation(String),
}

/// Specialized result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Specialized result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Specialized result type for interpolation operations
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let unknown = RmkError::from(ExecutionError::UnknownTask("nope".to_string()));
        assert_eq!(unknown.exit_code(), UNKNOWN_TASK_EXIT_CODE);

        let failed = RmkError::from(ExecutionError::CommandFailed {
            command: "flake8".to_string(),
            code: 3,
        });
        assert_eq!(failed.exit_code(), 3);

        let missing = RmkError::from(ExecutionError::MissingTool {
            command: "mypy".to_string(),
        });
        assert_eq!(missing.exit_code(), MISSING_TOOL_EXIT_CODE);

        let config = RmkError::from(ConfigError::DuplicateTask("lint".to_string()));
        assert_eq!(config.exit_code(), 1);
    }

    #[test]
    fn test_command_failure_message_names_command() {
        let err = ExecutionError::CommandFailed {
            command: "pytest".to_string(),
            code: 2,
        };
        assert_eq!(err.to_string(), "Command `pytest` failed with exit code 2");
    }
}
