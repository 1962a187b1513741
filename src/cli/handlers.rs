//! Command handlers for all CLI operations
//!
//! Routing only; the real work lives in the per-area handler modules.

pub mod config;
pub mod control;
pub mod daemon;

use super::{CliContext, Commands};
use anyhow::Result;

use config::ConfigHandler;
use control::ControlHandler;
use daemon::DaemonHandler;

/// Coordinates all command handling with shared state from [`CliContext`].
pub struct CommandHandler {
    context: CliContext,
}

impl CommandHandler {
    pub fn new(context: CliContext) -> Self {
        Self { context }
    }

    /// Route a parsed command to its handler.
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        match command {
            Commands::Daemon { detach } => {
                DaemonHandler::new(&self.context).handle_daemon(detach).await
            }
            Commands::Ping => ControlHandler::new(&self.context).handle_ping().await,
            Commands::Update { option } => {
                ControlHandler::new(&self.context).handle_update(&option).await
            }
            Commands::Close => ControlHandler::new(&self.context).handle_close().await,
            Commands::Reload => ControlHandler::new(&self.context).handle_reload().await,
            Commands::Kill => ControlHandler::new(&self.context).handle_kill().await,
            Commands::GenerateConfig => ConfigHandler::new().handle_generate_config(),
        }
    }
}
