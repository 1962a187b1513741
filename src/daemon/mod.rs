//! Background daemon: socket server plus the snackbar event loop
//!
//! The daemon is two cooperating loops. [`IpcServer`] owns the unix
//! socket and the framing; [`SnackbarDaemon`] owns every piece of mutable
//! state and processes one event at a time. [`run_daemon`] wires them
//! together with a shared shutdown signal and cleans the socket up on the
//! way out.

pub mod ipc;
pub mod ipc_server;
pub mod protocol;
pub mod server;
pub mod snackbar;

pub use ipc::create_socket_path;
pub use ipc_server::IpcServer;
pub use protocol::{DaemonRequest, DaemonResponse};
pub use server::{DaemonEvent, SnackbarDaemon};

use crate::config::Config;
use crate::runner::CommandRunner;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Run the daemon until a kill request, ctrl-c, or a fatal server error.
///
/// `config_path` is remembered so a `Reload` without an explicit path
/// re-reads the file the daemon started from.
pub async fn run_daemon(
    config: Config,
    config_path: PathBuf,
    socket_path: PathBuf,
    runner: Arc<dyn CommandRunner>,
) -> Result<()> {
    let (event_sender, event_receiver) = flume::unbounded();
    let (shutdown_sender, shutdown_receiver) = flume::unbounded();

    let server = IpcServer::new(
        &socket_path,
        event_sender.clone(),
        shutdown_sender.clone(),
        shutdown_receiver.clone(),
    )?;

    let daemon = SnackbarDaemon::new(
        config,
        config_path,
        runner,
        event_sender,
        event_receiver,
        shutdown_receiver,
    );

    let ctrl_c_shutdown = shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received ctrl-c, stopping daemon");
            let _ = ctrl_c_shutdown.send_async(()).await;
        }
    });

    let cleanup_path = socket_path.clone();
    let _guard = scopeguard::guard((), move |_| {
        if cleanup_path.exists() {
            let _ = std::fs::remove_file(&cleanup_path);
        }
        info!("daemon cleanup completed");
    });

    // Either loop exiting (one of them consumes the shutdown signal)
    // tears the other down with it.
    tokio::select! {
        _ = server.run() => {}
        _ = daemon.run() => {}
    }

    Ok(())
}
