//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Nearby lunch suggestions from a business search API
#[derive(Parser, Debug)]
#[command(name = "lunchlist")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "pretty")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch listings around a position
    Search {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: String,

        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: String,

        /// Search term (overrides config)
        #[arg(long)]
        term: Option<String>,

        /// Radius in meters (overrides config)
        #[arg(long)]
        radius: Option<u32>,

        /// Results per page (overrides config)
        #[arg(long)]
        limit: Option<u32>,

        /// Upstream calls allowed for this fetch (overrides config)
        #[arg(long)]
        max_calls: Option<u32>,

        /// Preference book (JSON) used to order and annotate results
        #[arg(long)]
        preferences: Option<PathBuf>,
    },

    /// Show which offsets a fetch would request
    Plan {
        /// Total reported by the first page
        #[arg(long)]
        total: u64,

        /// Number of items the first page returned
        #[arg(long)]
        first_page: usize,

        /// Results per page (overrides config)
        #[arg(long)]
        limit: Option<u32>,

        /// Upstream calls allowed (overrides config)
        #[arg(long)]
        max_calls: Option<u32>,
    },

    /// Print the effective configuration
    Config,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
