//! CLI Module
//!
//! Command-line interface for FireDrill using Clap v4.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// FireDrill - Terminal Incident-Command Training Simulator
#[derive(Parser, Debug)]
#[command(name = "firedrill")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a training session (default)
    Run {
        /// Override the turn cap for this session
        #[arg(long)]
        max_turns: Option<usize>,

        /// Override the evaluation report output path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Show the effective configuration
    Config,
}

/// Main CLI entry point
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    crate::logging::init(cli.debug);

    let config = crate::config::Config::load(cli.config.as_deref())?;

    match cli.command {
        None => commands::cmd_run(config, None, None).await,
        Some(Commands::Run { max_turns, report }) => {
            commands::cmd_run(config, max_turns, report).await
        }
        Some(Commands::Config) => commands::cmd_config(&config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn run_overrides_parse() {
        let cli = Cli::parse_from(["firedrill", "run", "--max-turns", "20", "-r", "out.md"]);
        match cli.command {
            Some(Commands::Run { max_turns, report }) => {
                assert_eq!(max_turns, Some(20));
                assert_eq!(report, Some(PathBuf::from("out.md")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
