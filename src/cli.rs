//! Command-line interface for `cachectl`, a small demo binary exercising a
//! single named [`crate::Table`] end to end.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

/// `cachectl` - exercise a TTL cache table from the command line
#[derive(Parser, Debug)]
#[command(name = "cachectl")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long, env = "CACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Name of the table to operate on
    #[arg(short, long, default_value = "default", env = "CACHE_TABLE")]
    pub table: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", env = "CACHE_LOG_LEVEL")]
    pub log_level: String,

    /// Log format (text, json)
    #[arg(long, env = "CACHE_LOG_FORMAT")]
    pub log_format: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Operations `cachectl` can run against a table.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Admit a key unconditionally, replacing any existing entry.
    Set {
        /// Key to admit.
        key: String,
        /// Value to store.
        value: String,
        /// Lifespan before the entry is eligible for expiry (e.g. "30s", "0" for never).
        #[arg(long, value_parser = humantime::parse_duration, default_value = "0s")]
        life_span: Duration,
    },
    /// Admit a key only if it doesn't already exist.
    Add {
        /// Key to admit.
        key: String,
        /// Value to store.
        value: String,
        /// Lifespan before the entry is eligible for expiry.
        #[arg(long, value_parser = humantime::parse_duration, default_value = "0s")]
        life_span: Duration,
    },
    /// Look up a key, printing its value or reporting a miss.
    Get {
        /// Key to look up.
        key: String,
    },
    /// Check whether a key exists, without refreshing its access time.
    Exists {
        /// Key to check.
        key: String,
    },
    /// Remove a key.
    Delete {
        /// Key to remove.
        key: String,
    },
    /// Print the number of entries currently held.
    Count,
    /// Print the `n` most-accessed entries, descending by access count.
    MostAccessed {
        /// Number of entries to print.
        n: usize,
    },
}
