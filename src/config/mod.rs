//! Configuration parsing and validation
//!
//! This module handles parsing of rmk.yml task files, the built-in task set,
//! and validation of configuration structure.

pub mod defaults;
pub mod parse;
pub mod schema;
pub mod types;

// Re-export main types
pub use defaults::*;
pub use parse::*;
pub use schema::*;
pub use types::*;
