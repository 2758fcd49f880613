//! Built-in task set, used when no rmk.yml is found

use crate::config::parse::parse_config;
use crate::config::types::Config;
use crate::error::RmkError;

/// Task file compiled into the binary
pub const BUILTIN_TASKS: &str = include_str!("default.yml");

/// Parse the built-in task set
pub fn builtin_config() -> Result<Config, RmkError> {
    parse_config(BUILTIN_TASKS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::validate_config;
    use crate::config::types::{Command, Run};

    #[test]
    fn test_builtin_config_is_valid() {
        let config = builtin_config().unwrap();
        validate_config(&config).unwrap();
    }

    #[test]
    fn test_builtin_tasks_and_default() {
        let config = builtin_config().unwrap();
        let names: Vec<&str> = config.tasks.names().collect();
        assert_eq!(
            names,
            vec![
                "test",
                "format",
                "lint",
                "unittest",
                "coverage",
                "pre-commit",
                "clean",
                "docs"
            ]
        );
        assert_eq!(config.default.as_deref(), Some("test"));
        assert_eq!(config.tasks.names().next(), Some("test"));
    }

    #[test]
    fn test_builtin_test_task_only_has_prerequisites() {
        let config = builtin_config().unwrap();
        let test = config.tasks.get("test").unwrap();
        assert_eq!(test.deps, vec!["format", "lint", "unittest"]);
        assert!(test.run.is_empty());
    }

    #[test]
    fn test_builtin_format_commands() {
        let config = builtin_config().unwrap();
        let format = config.tasks.get("format").unwrap();
        let commands: Vec<&str> = format
            .run
            .iter()
            .map(|run| match run {
                Run::SimpleCommand(cmd) => cmd.as_str(),
                Run::Complex(item) => match &item.command[0] {
                    Command::Simple(cmd) => cmd.as_str(),
                    Command::Complex(detail) => detail.exec.as_str(),
                },
            })
            .collect();
        assert_eq!(
            commands,
            vec!["isort ${sources} ${tests}", "black ${sources} ${tests}"]
        );
    }
}
