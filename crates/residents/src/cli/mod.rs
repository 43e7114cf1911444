//! Command-line interface for residents.
//!
//! This module provides the CLI structure for the `residents` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    resolve_floor, AddCommand, ClearCommand, ConfigCommand, DeleteCommand, EditCommand,
    ExportCommand, JsonFlag, ListCommand, OutputFormat,
};

use crate::logging::Verbosity;

/// residents - Keep the building's resident register
///
/// Records residents (name, floor, apartment, phone, notes) in a local
/// store and exports the list as a printable document.
#[derive(Debug, Parser)]
#[command(name = "residents")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for trace)
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
    /// Show all residents
    List(ListCommand),

    /// Add a resident
    Add(AddCommand),

    /// Change a resident's fields
    Edit(EditCommand),

    /// Remove a resident
    Delete(DeleteCommand),

    /// Remove every resident
    Clear(ClearCommand),

    /// Write the printable report
    Export(ExportCommand),

    /// Show register figures
    Stats(JsonFlag),

    /// List the floor labels
    Floors,

    /// Show what is in storage
    Debug(JsonFlag),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "residents");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["residents", "-q", "list"]).verbosity(), Verbosity::Quiet);
        assert_eq!(parse(&["residents", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["residents", "-v", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["residents", "-vv", "list"]).verbosity(), Verbosity::Trace);
    }

    #[test]
    fn test_parse_list_format() {
        let cli = parse(&["residents", "list", "--format", "json"]);
        match cli.command {
            Command::List(cmd) => assert_eq!(cmd.format, OutputFormat::Json),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&[
            "residents",
            "add",
            "--name",
            "محمد علي",
            "--floor",
            "1",
            "--apartment",
            "5",
            "--phone",
            "01012345678",
        ]);
        match cli.command {
            Command::Add(cmd) => {
                assert_eq!(cmd.name, "محمد علي");
                assert_eq!(cmd.notes, "");
                assert_eq!(cmd.to_form().floor, "الدور الأول");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_requires_fields() {
        assert!(Cli::try_parse_from(["residents", "add", "--name", "أحمد"]).is_err());
    }

    #[test]
    fn test_parse_add_negative_apartment_reaches_validation() {
        let cli = parse(&[
            "residents", "add", "-n", "أحمد", "-f", "1", "-a", "-4", "-p", "01012345678",
        ]);
        assert!(matches!(cli.command, Command::Add(cmd) if cmd.apartment == "-4"));
    }

    #[test]
    fn test_parse_edit() {
        let cli = parse(&["residents", "edit", "2", "--apartment", "40"]);
        match cli.command {
            Command::Edit(cmd) => {
                assert_eq!(cmd.position(), 1);
                assert_eq!(cmd.apartment.as_deref(), Some("40"));
                assert!(cmd.name.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_row_number_zero_rejected() {
        assert!(Cli::try_parse_from(["residents", "delete", "0"]).is_err());
    }

    #[test]
    fn test_parse_delete_yes() {
        let cli = parse(&["residents", "delete", "3", "--yes"]);
        assert!(matches!(cli.command, Command::Delete(cmd) if cmd.yes && cmd.position() == 2));
    }

    #[test]
    fn test_parse_clear() {
        let cli = parse(&["residents", "clear"]);
        assert!(matches!(cli.command, Command::Clear(ClearCommand { yes: false })));
    }

    #[test]
    fn test_parse_export_output() {
        let cli = parse(&["residents", "export", "-o", "/tmp/list.html"]);
        assert!(matches!(
            cli.command,
            Command::Export(ExportCommand { output: Some(ref p) }) if p == &PathBuf::from("/tmp/list.html")
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["residents", "-c", "/custom/config.toml", "stats"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_subcommands() {
        assert!(matches!(
            parse(&["residents", "config", "path"]).command,
            Command::Config(ConfigCommand::Path)
        ));
        assert!(matches!(
            parse(&["residents", "config", "show", "--json"]).command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }
}
