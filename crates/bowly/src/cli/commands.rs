//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgGroup, Args, Subcommand};

/// Add command arguments.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["score", "frames"])))]
pub struct AddCommand {
    /// Date the game was bowled (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Final score (0-300)
    #[arg(short, long)]
    pub score: Option<u16>,

    /// Number of strikes, with --score
    #[arg(long, requires = "score")]
    pub strikes: Option<u8>,

    /// Number of spares, with --score
    #[arg(long, requires = "score")]
    pub spares: Option<u8>,

    /// Frames notation, e.g. "X,9/,81,X,71,9/,33,X,X,X81"
    #[arg(short, long)]
    pub frames: Option<String>,
}

/// Score command arguments.
#[derive(Debug, Args)]
pub struct ScoreCommand {
    /// Frames notation: ten comma-separated frames
    pub frames: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Interactive entry arguments.
#[derive(Debug, Args)]
pub struct EnterCommand {
    /// Date to record the game under (defaults to today)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Store the computed game when the session ends
    #[arg(short, long)]
    pub save: bool,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Show only the last N games
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Remove command arguments.
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Record id, or a date (YYYY-MM-DD) to remove every game on that day
    pub key: String,
}

/// Clear command arguments.
#[derive(Debug, Args)]
pub struct ClearCommand {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Target command arguments.
#[derive(Debug, Args)]
pub struct TargetCommand {
    /// New target average (0-300); shows the current one if omitted
    pub score: Option<f64>,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    /// Output file (defaults to bowly-backup-YYYY-MM-DD.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Import command arguments.
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// Backup file to import; replaces all stored games
    pub path: PathBuf,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
