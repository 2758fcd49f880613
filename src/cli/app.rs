//! Main CLI application

use crate::config::{load_config, load_env_file, validate_config, Config};
use crate::error::{ConfigError, RmkError};
use crate::runner::{Context, Executor, ProcessRunner, Registry, Verbosity};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use clap_complete::Shell;
use colored::Colorize;
use std::collections::HashMap;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

/// Binary name used for help and completion scripts
const BIN_NAME: &str = "rmk";

/// CLI application
pub struct App {
    /// Parsed configuration
    config: Config,
    /// Config file path, `None` for the built-in task set
    config_path: Option<PathBuf>,
    /// Tasks available to this invocation
    registry: Registry,
}

impl App {
    /// Load and validate the task file (explicit, discovered, or built-in)
    pub fn load(file: Option<&Path>) -> Result<Self, RmkError> {
        let loaded = load_config(file)?;
        validate_config(&loaded.config)?;
        let registry = Registry::from_config(&loaded.config)?;

        Ok(App {
            config: loaded.config,
            config_path: loaded.path,
            registry,
        })
    }

    /// Build the clap command for this task file
    pub fn command(&self) -> Command {
        build_command(&self.config, &self.registry)
    }

    /// Run the application with the given command line, returning the exit code
    pub fn run_from<I, T>(self, args: I) -> Result<i32, RmkError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut command = self.command();
        let matches = command.clone().get_matches_from(args);
        self.check_file_arg(&matches)?;

        if let Some(shell) = matches.get_one::<Shell>("completions") {
            clap_complete::generate(*shell, &mut command, BIN_NAME, &mut io::stdout());
            return Ok(0);
        }

        if matches.get_flag("list") {
            self.print_task_list();
            return Ok(0);
        }

        let task_name = match matches.subcommand() {
            Some((name, _)) => name.to_string(),
            None => self
                .registry
                .default_task()
                .ok_or_else(|| ConfigError::Invalid("no tasks are defined".to_string()))?
                .to_string(),
        };

        let mut ctx = Context::new()
            .with_verbosity(get_verbosity(&matches))
            .with_dry_run(matches.get_flag("dry-run"));

        if let Some(path) = &self.config_path {
            ctx = ctx.with_config_path(path.clone());
        }

        if let Some(interpreter) = &self.config.interpreter {
            ctx = ctx.with_interpreter(interpreter.clone());
        }

        let vars = self.resolve_vars(&matches, &ctx.config_dir())?;
        ctx = ctx.with_vars(vars);

        match &self.config_path {
            Some(path) => ctx.print_debug(&format!("Using task file {}", path.display())),
            None => ctx.print_debug("Using built-in tasks"),
        }

        let mut executor = Executor::new(&self.registry, ProcessRunner::new());
        let report = executor.run(&task_name, &mut ctx)?;

        ctx.print_debug(&format!(
            "Completed {} task(s), {} command(s), {} path(s) removed",
            report.tasks.len(),
            report.commands,
            report.removed
        ));

        Ok(0)
    }

    /// Make sure clap resolved `--file` to the task file that was loaded
    ///
    /// The task file is loaded before clap runs, so a flag spelling the
    /// pre-scan missed would otherwise run the wrong tasks.
    fn check_file_arg(&self, matches: &ArgMatches) -> Result<(), RmkError> {
        let Some(file) = matches.get_one::<String>("file") else {
            return Ok(());
        };

        if self.config_path.as_deref() == Some(Path::new(file)) {
            return Ok(());
        }

        Err(ConfigError::Invalid(format!(
            "could not resolve task file '{}'; pass it as `--file {}`",
            file, file
        ))
        .into())
    }

    /// Merge task file vars, env file vars, and `--set` overrides (in that order)
    fn resolve_vars(
        &self,
        matches: &ArgMatches,
        base_dir: &Path,
    ) -> Result<HashMap<String, String>, RmkError> {
        let mut vars = self.config.vars.clone();
        vars.extend(load_env_file(&self.config, base_dir)?);

        if let Some(overrides) = matches.get_many::<(String, String)>("set") {
            vars.extend(overrides.cloned());
        }

        Ok(vars)
    }

    /// Print public tasks in declaration order
    fn print_task_list(&self) {
        let default = self.registry.default_task();
        let width = self
            .registry
            .public_tasks()
            .map(|t| t.name.len())
            .max()
            .unwrap_or(0);

        println!("Available tasks:");
        for task in self.registry.public_tasks() {
            let marker = if Some(task.name.as_str()) == default {
                " (default)".yellow().to_string()
            } else {
                String::new()
            };
            let deps = if task.deps.is_empty() {
                String::new()
            } else {
                format!(" [{}]", task.deps.join(", ")).dimmed().to_string()
            };

            println!(
                "  {}  {}{}{}",
                format!("{:<width$}", task.name, width = width).bold(),
                task.usage.as_deref().unwrap_or(""),
                deps,
                marker
            );
        }
    }
}

/// Build the clap command from configuration
fn build_command(config: &Config, registry: &Registry) -> Command {
    let mut cmd = Command::new(BIN_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about(
            config
                .usage
                .clone()
                .unwrap_or_else(|| "A small task graph runner".to_string()),
        )
        .disable_help_subcommand(true)
        .allow_external_subcommands(true)
        .subcommand_value_name("TASK")
        .subcommand_help_heading("Tasks")
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .value_name("FILE")
                .help("Path to rmk.yml task file")
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only print command output and errors")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("silent")
                .short('s')
                .long("silent")
                .help("Print no output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Print verbose output")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("dry-run")
                .short('n')
                .long("dry-run")
                .help("Print what would run without running it")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List available tasks")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("set")
                .long("set")
                .value_name("KEY=VALUE")
                .help("Override a task file variable")
                .value_parser(parse_key_val)
                .action(ArgAction::Append)
                .global(true),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .help("Print a shell completion script")
                .value_parser(value_parser!(Shell))
                .global(true),
        );

    // Add subcommands for each public task
    for task in registry.public_tasks() {
        let mut task_cmd = Command::new(task.name.clone()).about(task.usage.clone().unwrap_or_default());

        if let Some(desc) = &task.description {
            task_cmd = task_cmd.long_about(desc.clone());
        }

        cmd = cmd.subcommand(task_cmd);
    }

    cmd
}

/// Get verbosity level from matches
fn get_verbosity(matches: &ArgMatches) -> Verbosity {
    if matches.get_flag("silent") {
        Verbosity::Silent
    } else if matches.get_flag("quiet") {
        Verbosity::Quiet
    } else if matches.get_flag("verbose") {
        Verbosity::Verbose
    } else {
        Verbosity::Normal
    }
}

/// Parse a `KEY=VALUE` pair
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

/// Run the CLI application with the process arguments
pub fn run() -> Result<i32, RmkError> {
    let args: Vec<String> = std::env::args().collect();
    let app = App::load(extract_file_arg(&args).as_deref())?;
    app.run_from(args)
}

/// Extract --file argument before clap parsing
///
/// Accepts `--file X`, `--file=X`, `-f X`, `-fX` and `-f=X`.
fn extract_file_arg(args: &[String]) -> Option<PathBuf> {
    for (i, arg) in args.iter().enumerate().skip(1) {
        if arg == "--" {
            break;
        }
        if arg == "--file" || arg == "-f" {
            return args.get(i + 1).map(PathBuf::from);
        }
        if let Some(path) = arg.strip_prefix("--file=") {
            return Some(PathBuf::from(path));
        }
        if let Some(rest) = arg.strip_prefix("-f") {
            let path = rest.strip_prefix('=').unwrap_or(rest);
            return Some(PathBuf::from(path));
        }
    }
    None
}
