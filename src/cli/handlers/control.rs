//! Handlers for the client-side daemon control commands
//!
//! Each command is one request/reply exchange: print the reply message
//! and exit 0 on `Ok`, exit non-zero on `Error` or when the daemon is
//! unreachable.

use super::super::CliContext;
use crate::client::IpcClient;
use crate::daemon::DaemonResponse;
use anyhow::{bail, Result};
use std::time::Instant;

pub struct ControlHandler<'a> {
    context: &'a CliContext,
}

impl<'a> ControlHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    fn client(&self) -> IpcClient {
        IpcClient::new(&self.context.socket_path)
    }

    pub async fn handle_ping(&self) -> Result<()> {
        let start = Instant::now();
        let response = self.client().ping().await?;
        let latency = start.elapsed();

        match response {
            DaemonResponse::Ok { message } => {
                println!("{message} (latency: {latency:.1?})");
                Ok(())
            }
            DaemonResponse::Error { message } => bail!(message),
        }
    }

    pub async fn handle_update(&self, option: &str) -> Result<()> {
        finish(self.client().update(option).await?)
    }

    pub async fn handle_close(&self) -> Result<()> {
        finish(self.client().close().await?)
    }

    pub async fn handle_reload(&self) -> Result<()> {
        // Forward the config path only when the caller named one; the
        // daemon otherwise re-reads the file it started from.
        let config_path = self
            .context
            .config_overridden
            .then(|| self.context.config_path.clone());

        finish(self.client().reload(config_path).await?)
    }

    pub async fn handle_kill(&self) -> Result<()> {
        finish(self.client().kill().await?)
    }
}

fn finish(response: DaemonResponse) -> Result<()> {
    match response {
        DaemonResponse::Ok { message } => {
            if !message.is_empty() {
                println!("{message}");
            }
            Ok(())
        }
        DaemonResponse::Error { message } => bail!(message),
    }
}
