//! Task execution engine
//!
//! This module handles the execution of tasks, including command running,
//! artifact removal, and dependency resolution.

pub mod command;
pub mod context;
pub mod executor;
pub mod interpolate;
pub mod remove;
pub mod task;

// Re-export main types
pub use command::*;
pub use context::*;
pub use executor::*;
pub use interpolate::*;
pub use remove::*;
pub use task::*;
