//! Command-line interface for bowly.
//!
//! This module provides the CLI structure for the `bowly` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ClearCommand, ConfigCommand, EnterCommand, ExportCommand, ImportCommand,
    ListCommand, RemoveCommand, ScoreCommand, StatsCommand, TargetCommand,
};

/// bowly - Track your bowling scores
///
/// Log games by final score or frame by frame, follow your average against
/// a target and get a suggestion based on recent form.
#[derive(Debug, Parser)]
#[command(name = "bowly")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log a game by final score or by frames
    Add(AddCommand),

    /// Validate and score frames without saving
    Score(ScoreCommand),

    /// Enter a game roll by roll on a keypad
    Enter(EnterCommand),

    /// List logged games
    List(ListCommand),

    /// Remove a game by id, or every game on a date
    Remove(RemoveCommand),

    /// Remove all games
    Clear(ClearCommand),

    /// Show statistics and a coaching suggestion
    Stats(StatsCommand),

    /// Show or set the target average
    Target(TargetCommand),

    /// Write all games and the target to a JSON backup
    Export(ExportCommand),

    /// Replace all games and the target from a JSON backup
    Import(ImportCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args.iter().copied()).unwrap()
    }

    fn stats_cli(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            verbose,
            quiet,
            command: Command::Stats(StatsCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "bowly");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity() {
        use crate::logging::Verbosity;

        assert_eq!(stats_cli(0, true).verbosity(), Verbosity::Quiet);
        assert_eq!(stats_cli(0, false).verbosity(), Verbosity::Normal);
        assert_eq!(stats_cli(1, false).verbosity(), Verbosity::Verbose);
        assert_eq!(stats_cli(3, false).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_add_by_score() {
        let cli = parse(&[
            "bowly", "add", "--date", "2026-03-14", "--score", "187", "--strikes", "5",
        ]);
        let Command::Add(add) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(add.date.unwrap().to_string(), "2026-03-14");
        assert_eq!(add.score, Some(187));
        assert_eq!(add.strikes, Some(5));
        assert_eq!(add.spares, None);
    }

    #[test]
    fn test_parse_add_by_frames() {
        let cli = parse(&["bowly", "add", "--frames", "X,X,X,X,X,X,X,X,X,XXX"]);
        assert!(matches!(cli.command, Command::Add(AddCommand { frames: Some(_), .. })));
    }

    #[test]
    fn test_parse_add_requires_one_source() {
        assert!(Cli::try_parse_from(["bowly", "add"]).is_err());
        assert!(Cli::try_parse_from(["bowly", "add", "--score", "100", "--frames", "X"]).is_err());
        assert!(Cli::try_parse_from(["bowly", "add", "--frames", "X", "--strikes", "1"]).is_err());
    }

    #[test]
    fn test_parse_add_bad_date() {
        assert!(Cli::try_parse_from(["bowly", "add", "--date", "14/03/2026", "-s", "1"]).is_err());
    }

    #[test]
    fn test_parse_score() {
        let cli = parse(&["bowly", "score", "X,9/,81", "--json"]);
        let Command::Score(score) = cli.command else {
            panic!("expected score");
        };
        assert_eq!(score.frames, "X,9/,81");
        assert!(score.json);
    }

    #[test]
    fn test_parse_enter() {
        let cli = parse(&["bowly", "enter", "--save"]);
        assert!(matches!(cli.command, Command::Enter(EnterCommand { save: true, .. })));
    }

    #[test]
    fn test_parse_list_and_stats() {
        let cli = parse(&["bowly", "list", "-l", "5"]);
        assert!(matches!(cli.command, Command::List(ListCommand { limit: Some(5), .. })));

        let cli = parse(&["bowly", "stats", "-j"]);
        assert!(matches!(cli.command, Command::Stats(StatsCommand { json: true })));
    }

    #[test]
    fn test_parse_remove_clear_target() {
        let cli = parse(&["bowly", "remove", "2026-03-14"]);
        assert!(matches!(cli.command, Command::Remove(_)));

        let cli = parse(&["bowly", "clear", "--yes"]);
        assert!(matches!(cli.command, Command::Clear(ClearCommand { yes: true })));

        let cli = parse(&["bowly", "target", "182.5"]);
        let Command::Target(target) = cli.command else {
            panic!("expected target");
        };
        assert_eq!(target.score, Some(182.5));
    }

    #[test]
    fn test_parse_export_import() {
        let cli = parse(&["bowly", "export", "-o", "/tmp/b.json"]);
        assert!(matches!(cli.command, Command::Export(ExportCommand { output: Some(_) })));

        let cli = parse(&["bowly", "import", "/tmp/b.json"]);
        assert!(matches!(cli.command, Command::Import(_)));
    }

    #[test]
    fn test_parse_config_subcommands() {
        let cli = parse(&["bowly", "config", "show", "--json"]);
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Show { json: true })));

        let cli = parse(&["bowly", "config", "path"]);
        assert!(matches!(cli.command, Command::Config(ConfigCommand::Path)));
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = parse(&["bowly", "stats", "-c", "/custom/config.toml", "-vv"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
        assert_eq!(cli.verbose, 2);

        let cli = parse(&["bowly", "-q", "list"]);
        assert!(cli.quiet);
    }
}
