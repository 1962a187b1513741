//! Command definitions and structures for the CLI

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "snackd")]
#[command(about = "Snackbar indicator daemon driven by external commands")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Unix socket used to reach the daemon
    #[arg(short, long, global = true)]
    pub socket: Option<PathBuf>,

    /// Config file (defaults to <config dir>/snackd/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the daemon
    Daemon {
        /// Run in the background (detached)
        #[arg(short, long)]
        detach: bool,
    },

    /// Ping the daemon to check connectivity
    Ping,

    /// Open or refresh the snackbar with the given option
    Update {
        /// Option name, matched verbatim against `options` in the config
        option: String,
    },

    /// Close the snackbar immediately
    Close,

    /// Ask the daemon to reload its config
    Reload,

    /// Stop the daemon
    Kill,

    /// Print a default config file to stdout
    GenerateConfig,
}
