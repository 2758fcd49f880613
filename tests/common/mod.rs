//! Common test utilities

#![allow(dead_code)]

use rmk::config::{parse_config, validate_config};
use rmk::runner::{Context, Registry, Verbosity};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a temporary directory with an rmk.yml file
pub fn create_test_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("rmk.yml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

/// Create a test config with an empty subdirectory next to it
pub fn create_test_config_in_subdir(content: &str) -> (TempDir, PathBuf, PathBuf) {
    let (temp_dir, config_path) = create_test_config(content);
    let sub_dir = temp_dir.path().join("subdir");
    fs::create_dir(&sub_dir).unwrap();
    (temp_dir, config_path, sub_dir)
}

/// Parse, validate and build a registry from YAML
pub fn registry_from_yaml(yaml: &str) -> Registry {
    let config = parse_config(yaml).unwrap();
    validate_config(&config).unwrap();
    Registry::from_config(&config).unwrap()
}

/// A silent context rooted at `dir`
pub fn silent_context(dir: &Path) -> Context {
    Context::new()
        .with_working_dir(dir.to_path_buf())
        .with_verbosity(Verbosity::Silent)
}

/// Lines appended to `log.txt` in `dir` by test commands
pub fn read_log(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("log.txt"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
