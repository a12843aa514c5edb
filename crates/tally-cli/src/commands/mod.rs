//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `common` - Shared utilities (config loading and flag overrides)
//! - `summarize` - Full run and dry-run validation of an expense file
//! - `layouts` - Date layout listing

pub mod common;
pub mod layouts;
pub mod summarize;

// Re-export command functions for main.rs
pub use common::*;
pub use layouts::*;
pub use summarize::*;
