//! Configuration file parsing and discovery

use crate::config::defaults::builtin_config;
use crate::config::types::Config;
use crate::error::{ConfigError, ConfigResult, RmkError};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file names to search for
const CONFIG_FILE_NAMES: &[&str] = &["rmk.yml", "rmk.yaml"];

/// Dotenv file loaded next to the task file when `env-file` is not set
const DEFAULT_ENV_FILE: &str = ".env";

/// Find the configuration file by searching current and parent directories
pub fn find_config_file() -> ConfigResult<PathBuf> {
    find_config_file_from(env::current_dir().map_err(|e| {
        ConfigError::Invalid(format!("Failed to get current directory: {}", e))
    })?)
}

/// Find the configuration file starting from a specific directory
pub fn find_config_file_from(start_dir: PathBuf) -> ConfigResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in CONFIG_FILE_NAMES {
            let config_path = current_dir.join(file_name);
            searched_paths.push(config_path.display().to_string());

            if config_path.is_file() {
                return Ok(config_path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(ConfigError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a configuration file from a path
pub fn parse_config_file(path: &Path) -> Result<Config, RmkError> {
    let contents = fs::read_to_string(path).map_err(|e| {
        ConfigError::Invalid(format!("Failed to read {}: {}", path.display(), e))
    })?;

    parse_config(&contents)
}

/// Parse configuration from a string
pub fn parse_config(yaml: &str) -> Result<Config, RmkError> {
    let config: Config = serde_yaml::from_str(yaml)?;
    Ok(config)
}

/// A parsed task file and where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,

    /// `None` when the built-in task set is in use
    pub path: Option<PathBuf>,
}

/// Load the task file to use for this invocation
///
/// An explicit path must exist. Without one, the current directory and its
/// parents are searched, falling back to the built-in task set.
pub fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, RmkError> {
    if let Some(path) = explicit {
        let config = parse_config_file(path)?;
        return Ok(LoadedConfig {
            config,
            path: Some(path.to_path_buf()),
        });
    }

    match find_config_file() {
        Ok(path) => {
            let config = parse_config_file(&path)?;
            Ok(LoadedConfig {
                config,
                path: Some(path),
            })
        }
        Err(ConfigError::NotFound(_)) => Ok(LoadedConfig {
            config: builtin_config()?,
            path: None,
        }),
        Err(e) => Err(e.into()),
    }
}

/// Read variables from the task file's dotenv file
///
/// A missing default `.env` is not an error; a missing file named through
/// `env-file` is.
pub fn load_env_file(config: &Config, base_dir: &Path) -> ConfigResult<HashMap<String, String>> {
    let (path, required) = match &config.env_file {
        Some(file) => (base_dir.join(file), true),
        None => (base_dir.join(DEFAULT_ENV_FILE), false),
    };

    if !path.is_file() {
        if required {
            return Err(ConfigError::EnvFile {
                path,
                error: "file does not exist".to_string(),
            });
        }
        return Ok(HashMap::new());
    }

    let to_config_error = |e: dotenvy::Error| ConfigError::EnvFile {
        path: path.clone(),
        error: e.to_string(),
    };

    let mut vars = HashMap::new();
    for item in dotenvy::from_path_iter(&path).map_err(to_config_error)? {
        let (key, value) = item.map_err(to_config_error)?;
        vars.insert(key, value);
    }

    Ok(vars)
}
