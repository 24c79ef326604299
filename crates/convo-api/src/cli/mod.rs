//! CLI command definitions for the `convo` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod history;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Session-scoped chat service with bounded conversation history.
#[derive(Parser)]
#[command(name = "convo", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the TOML config file (default: ~/.convo/config.toml).
    #[arg(long, global = true, env = "CONVO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (overrides `[server] port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides `[server] host`).
        #[arg(long)]
        host: Option<String>,

        /// Model provider API key.
        #[arg(long, env = "CONVO_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Inspect or reset a session's stored history.
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// Print a session's messages, oldest first.
    Show {
        /// Session identifier.
        session_id: String,
    },

    /// Remove all messages of a session.
    Clear {
        /// Session identifier.
        session_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["convo", "-vv", "serve", "--port", "9000"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Serve { port, host, .. } => {
                assert_eq!(port, Some(9000));
                assert!(host.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_history_show() {
        let cli = Cli::parse_from(["convo", "history", "show", "s1", "--json"]);
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::History {
                action: HistoryCommand::Show { ref session_id }
            } if session_id == "s1"
        ));
    }
}
