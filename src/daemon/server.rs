//! Snackbar daemon event loop
//!
//! The loop exclusively owns [`SnackbarState`]. Client requests and
//! timer-elapse events arrive through one inbox and are handled one at a
//! time, which is the whole concurrency story: a cancel processed before
//! a deadline always wins, and an elapse that was already queued when its
//! timer got superseded is discarded by the generation check.

use super::protocol::{DaemonRequest, DaemonResponse};
use super::snackbar::{AutoCloseTimer, SnackbarState};
use crate::config::Config;
use crate::runner::CommandRunner;
use flume::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// One unit of work for the event loop.
pub enum DaemonEvent {
    /// A decoded client request plus the channel its reply goes back on.
    Request {
        request: DaemonRequest,
        reply: oneshot::Sender<DaemonResponse>,
    },
    /// An armed auto-close deadline elapsed.
    AutoCloseElapsed { generation: u64 },
}

/// The single owner of snackbar state.
pub struct SnackbarDaemon {
    config: Config,
    config_path: PathBuf,
    state: SnackbarState,
    runner: Arc<dyn CommandRunner>,
    event_sender: Sender<DaemonEvent>,
    event_receiver: Receiver<DaemonEvent>,
    shutdown_receiver: Receiver<()>,
    next_generation: u64,
}

impl SnackbarDaemon {
    pub fn new(
        config: Config,
        config_path: PathBuf,
        runner: Arc<dyn CommandRunner>,
        event_sender: Sender<DaemonEvent>,
        event_receiver: Receiver<DaemonEvent>,
        shutdown_receiver: Receiver<()>,
    ) -> Self {
        SnackbarDaemon {
            config,
            config_path,
            state: SnackbarState::new(),
            runner,
            event_sender,
            event_receiver,
            shutdown_receiver,
            next_generation: 0,
        }
    }

    /// Process events until shutdown is signaled or every sender is gone.
    pub async fn run(mut self) {
        info!("snackbar daemon started");

        loop {
            let event = tokio::select! {
                event = self.event_receiver.recv_async() => {
                    match event {
                        Ok(event) => event,
                        Err(_) => break,
                    }
                }

                _ = self.shutdown_receiver.recv_async() => {
                    info!("snackbar daemon received shutdown signal");
                    break;
                }
            };

            self.handle_event(event).await;
        }

        info!("snackbar daemon stopped");
    }

    async fn handle_event(&mut self, event: DaemonEvent) {
        match event {
            DaemonEvent::Request { request, reply } => {
                let response = self.handle_request(request).await;
                if reply.send(response).is_err() {
                    warn!("client went away before the reply was sent");
                }
            }
            DaemonEvent::AutoCloseElapsed { generation } => {
                self.handle_auto_close(generation).await;
            }
        }
    }

    async fn handle_request(&mut self, request: DaemonRequest) -> DaemonResponse {
        match request {
            DaemonRequest::Ping => {
                debug!("ping");
                DaemonResponse::ok("pong")
            }
            DaemonRequest::Update { option } => self.handle_update(&option).await,
            DaemonRequest::Close => self.handle_close().await,
            DaemonRequest::Reload { config_path } => self.handle_reload(config_path),
            DaemonRequest::Kill => {
                info!("kill");
                // No close command on kill; just make sure no timer fires
                // into the shutdown.
                self.state.cancel_timer();
                DaemonResponse::ok("ok")
            }
        }
    }

    async fn handle_update(&mut self, option: &str) -> DaemonResponse {
        let Some(index) = self.config.option_index(option) else {
            debug!("update: {option} (no such option)");
            return DaemonResponse::error("no such option");
        };

        // A second update supersedes the pending close instead of
        // re-opening.
        self.state.cancel_timer();
        if !self.state.is_open() {
            self.runner.run(&self.config.open_command).await;
        }

        self.runner
            .run(&self.config.render_update_command(index))
            .await;
        info!("update: {option} (index: {index})");

        let timer = self.arm_timer();
        self.state.open_with(timer);

        DaemonResponse::ok("")
    }

    async fn handle_close(&mut self) -> DaemonResponse {
        if self.state.is_open() {
            info!("close");
            self.state.cancel_timer();
            self.runner.run(&self.config.close_command).await;
            self.state.close();
        } else {
            // Closing an already-closed snackbar is not an error.
            debug!("close: already closed");
        }

        DaemonResponse::ok("")
    }

    async fn handle_auto_close(&mut self, generation: u64) {
        if !self.state.take_if_armed(generation) {
            debug!("stale auto-close (generation {generation}) ignored");
            return;
        }

        info!("auto-close after idle timeout");
        self.runner.run(&self.config.close_command).await;
        self.state.close();
    }

    fn handle_reload(&mut self, config_path: Option<PathBuf>) -> DaemonResponse {
        let path = config_path.unwrap_or_else(|| self.config_path.clone());

        match Config::load(&path) {
            Ok(config) => {
                info!("reload: using '{}'", path.display());
                self.config = config;
                self.config_path = path;
                DaemonResponse::ok("ok")
            }
            Err(e) => {
                warn!("reload: failed to load '{}': {e}", path.display());
                DaemonResponse::error("failed to reload")
            }
        }
    }

    /// Spawn a sleep task that posts an elapse event back into the inbox.
    /// Generations increase strictly, so a superseded timer's event can
    /// never match the one currently armed.
    fn arm_timer(&mut self) -> AutoCloseTimer {
        self.next_generation += 1;
        let generation = self.next_generation;
        let timeout = self.config.timeout();
        let events = self.event_sender.clone();

        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            let _ = events
                .send_async(DaemonEvent::AutoCloseElapsed { generation })
                .await;
        });

        AutoCloseTimer::new(generation, handle)
    }
}
