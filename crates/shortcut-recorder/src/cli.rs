//! Command-line argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Record and manage keyboard shortcut bindings
#[derive(Parser, Debug)]
#[command(name = "shortcut-recorder", version, about)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print every binding
    List,
    /// Record a new chord for a shortcut from key events on stdin
    Record {
        /// Shortcut to rebind, e.g. toggle_recording
        shortcut_id: String,
    },
    /// Restore a shortcut's default chord
    Reset {
        /// Shortcut to reset
        shortcut_id: String,
    },
}

impl Cli {
    /// Default log filter for this invocation.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "shortcut_recorder=debug,shortcut_recorder_core=debug"
        } else {
            "shortcut_recorder=info,shortcut_recorder_core=info"
        }
    }
}
