//! Command-line shell for the feed.
//!
//! The terminal stands in for the page: project summaries go to stdout,
//! previews are written as files, and navigation is driven by subcommands
//! or by the interactive `feed` loop.

pub mod commands;
pub mod render;
pub mod terminal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ct_core::Locale;

pub use commands::{parse_feed_command, run, FeedCommand};
pub use terminal::TerminalUi;

#[derive(Debug, Parser)]
#[command(name = "codetok", version, about = "Browse a feed of code projects from the terminal")]
pub struct Cli {
    /// Configuration file (defaults to <config_dir>/codetok/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Interface language: en or zh-cn
    #[arg(long, global = true)]
    pub locale: Option<Locale>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load one project by id and show it
    Open {
        id: String,
        /// Write the preview of the selected file into this directory
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Load a random project and show it
    Random {
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Interactive feed over stdin
    Feed {
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open_with_global_flags() {
        let cli = Cli::try_parse_from([
            "codetok", "--locale", "zh-cn", "open", "CAbUiIo=", "--out", "/tmp/p",
        ])
        .unwrap();

        assert_eq!(cli.locale, Some(Locale::ZhCn));
        match cli.command {
            Command::Open { id, out } => {
                assert_eq!(id, "CAbUiIo=");
                assert_eq!(out, Some(PathBuf::from("/tmp/p")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_locale_is_rejected() {
        assert!(Cli::try_parse_from(["codetok", "--locale", "fr", "random"]).is_err());
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["codetok"]).is_err());
    }
}
