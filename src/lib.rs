//! rmk - a small YAML-driven task graph runner
//!
//! Tasks name their prerequisites and the commands they run. Running a task
//! runs its prerequisites first, each at most once, and stops at the first
//! failing command. Without an rmk.yml, a built-in set of Python project
//! chores (format, lint, unittest, coverage, pre-commit, clean, docs, test)
//! is used.

// Public modules
pub mod cli;
pub mod config;
pub mod error;
pub mod runner;

// Re-export commonly used types
pub use error::{Result, RmkError};

/// Current version of rmk
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
