//! Command implementations for the settings-doc CLI
//!
//! Each command module handles the CLI interface and delegates to
//! settings-tree for the actual work.

pub mod build;
pub mod labels;
