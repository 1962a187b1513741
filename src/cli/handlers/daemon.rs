//! Daemon start handler
//!
//! Foreground start loads the config (fatal on error), takes over from a
//! previous instance if one still holds the socket, and runs the server
//! loops. Detached start re-execs the binary with a marker environment
//! variable; the child detaches from the terminal with `setsid` and logs
//! to a file instead of stderr.

use super::super::CliContext;
use crate::client::IpcClient;
use crate::config::Config;
use crate::daemon::run_daemon;
use crate::errors::AppError;
use crate::runner::ShellRunner;
use anyhow::{bail, Context, Result};
use std::process;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Set on the re-exec'd child so it knows to detach and log to a file.
pub const DETACHED_ENV: &str = "SNACKD_DAEMON_DETACHED";

const TAKEOVER_ATTEMPTS: u32 = 5;

pub struct DaemonHandler<'a> {
    context: &'a CliContext,
}

impl<'a> DaemonHandler<'a> {
    pub fn new(context: &'a CliContext) -> Self {
        Self { context }
    }

    pub async fn handle_daemon(&self, detach: bool) -> Result<()> {
        let is_detached_child = std::env::var(DETACHED_ENV).is_ok();

        if detach && !is_detached_child {
            self.start_detached()
        } else {
            self.start_foreground(is_detached_child).await
        }
    }

    async fn start_foreground(&self, detached: bool) -> Result<()> {
        // Bad config is fatal before the socket is ever bound.
        let config = Config::load(&self.context.config_path).with_context(|| {
            format!(
                "refusing to start with config '{}'",
                self.context.config_path.display()
            )
        })?;

        info!(
            "config: timeout {}ms, {} options, open '{}'",
            config.timeout_ms,
            config.options.len(),
            config.open_command
        );

        self.take_over_existing_daemon().await?;

        if detached {
            // Detach from the controlling terminal.
            #[cfg(unix)]
            unsafe {
                if libc::setsid() == -1 {
                    bail!("failed to create new session");
                }
            }
        }

        info!("daemon starting with PID {}", process::id());

        run_daemon(
            config,
            self.context.config_path.clone(),
            self.context.socket_path.clone(),
            Arc::new(ShellRunner),
        )
        .await
    }

    /// A previous instance may still hold the socket, or may have died
    /// without unlinking it. Ask it to stop; if nothing answers, the
    /// leftover file is stale and the bind path clears it.
    async fn take_over_existing_daemon(&self) -> Result<()> {
        let socket_path = &self.context.socket_path;
        if !socket_path.exists() {
            return Ok(());
        }

        info!(
            "found existing socket at {}, trying to stop the old daemon",
            socket_path.display()
        );
        let client = IpcClient::new(socket_path);

        for attempt in 0..TAKEOVER_ATTEMPTS {
            match client.kill().await {
                Ok(response) => {
                    debug!("old daemon answered: {}", response.message());
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
                Err(AppError::DaemonNotRunning { .. }) => {
                    debug!("nothing listening behind the socket file");
                    break;
                }
                Err(e) => {
                    debug!("kill attempt {attempt} failed: {e}");
                    tokio::time::sleep(Duration::from_millis(500)).await;
                }
            }

            if !socket_path.exists() {
                info!("old daemon stopped");
                return Ok(());
            }
        }

        if socket_path.exists() {
            warn!("old daemon did not answer, treating its socket as stale");
        }
        Ok(())
    }

    /// Spawn `snackd daemon --detach` with the marker variable set and
    /// make sure the child survives its first moments.
    fn start_detached(&self) -> Result<()> {
        let current_exe =
            std::env::current_exe().context("failed to get current executable path")?;

        let mut command = process::Command::new(current_exe);
        command
            .arg("daemon")
            .arg("--detach")
            .arg("--socket")
            .arg(&self.context.socket_path)
            .arg("--config")
            .arg(&self.context.config_path)
            .env(DETACHED_ENV, "1")
            .stdin(process::Stdio::null())
            .stdout(process::Stdio::null())
            .stderr(process::Stdio::null());
        if self.context.verbose {
            command.arg("--verbose");
        }

        let mut child = command.spawn().context("failed to spawn daemon process")?;

        // Give a misconfigured child the chance to fail loudly now rather
        // than silently in the background.
        std::thread::sleep(Duration::from_millis(500));
        match child.try_wait()? {
            Some(status) => bail!("daemon process exited immediately: {status}"),
            None => {
                println!("daemon started with PID {}", child.id());
                Ok(())
            }
        }
    }
}
