//! CLI command implementations for portwatch.
//!
//! This module provides implementations for all CLI subcommands:
//! - `render`: One fetch-and-render cycle printed as HTML
//! - `config`: Configuration file generation

pub mod config;
pub mod render;

// Re-export command functions
pub use config::command_config;
pub use render::command_render;
