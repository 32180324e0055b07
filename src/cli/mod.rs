//! CLI module
//!
//! Command-line interface for fetching lunch suggestions.
//!
//! # Commands
//!
//! - `search` - Fetch listings around a position
//! - `plan` - Show the offsets a fetch would request
//! - `config` - Print the effective configuration

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
