//! IPC server for daemon communication
//!
//! Accepts connections on the unix socket and speaks the framed protocol;
//! every decoded request is forwarded into the snackbar event loop, which
//! is the only place state changes. Connection handling is fanned out to
//! tasks, so a slow client stalls nobody but itself.

use super::protocol::{self, DaemonRequest, DaemonResponse};
use super::server::DaemonEvent;
use crate::errors::{AppError, AppResult};
use flume::{Receiver, Sender};
use std::path::Path;
use std::time::Duration;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

/// Per-operation socket I/O timeout; a client slower than this is abandoned
/// with state unchanged.
const IO_TIMEOUT: Duration = Duration::from_secs(5);

pub struct IpcServer {
    listener: UnixListener,
    event_sender: Sender<DaemonEvent>,
    shutdown_sender: Sender<()>,
    shutdown_receiver: Receiver<()>,
}

impl IpcServer {
    /// Bind the daemon socket, clearing any stale file left by an unclean
    /// shutdown. Bind failure is fatal at startup.
    pub fn new(
        socket_path: &Path,
        event_sender: Sender<DaemonEvent>,
        shutdown_sender: Sender<()>,
        shutdown_receiver: Receiver<()>,
    ) -> AppResult<Self> {
        if socket_path.exists() {
            std::fs::remove_file(socket_path).map_err(|e| {
                AppError::socket_with_source(socket_path, "failed to remove stale socket file", e)
            })?;
        }

        let listener = UnixListener::bind(socket_path)
            .map_err(|e| AppError::socket_with_source(socket_path, "failed to bind", e))?;

        info!("listening on {}", socket_path.display());

        Ok(IpcServer {
            listener,
            event_sender,
            shutdown_sender,
            shutdown_receiver,
        })
    }

    /// Accept connections until shutdown is signaled.
    pub async fn run(self) {
        loop {
            tokio::select! {
                _ = self.shutdown_receiver.recv_async() => {
                    info!("IPC server received shutdown signal");
                    break;
                }

                result = self.listener.accept() => {
                    match result {
                        Ok((stream, _addr)) => {
                            debug!("new client connection");
                            let events = self.event_sender.clone();
                            let shutdown = self.shutdown_sender.clone();

                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, events, shutdown).await {
                                    warn!("connection abandoned: {e}");
                                }
                            });
                        }
                        Err(e) => {
                            error!("failed to accept connection: {e}");
                        }
                    }
                }
            }
        }

        info!("IPC server stopped");
    }
}

/// One request, one reply, then the connection is done.
async fn handle_connection(
    mut stream: UnixStream,
    events: Sender<DaemonEvent>,
    shutdown: Sender<()>,
) -> AppResult<()> {
    let request = match timeout(IO_TIMEOUT, protocol::read_frame::<_, DaemonRequest>(&mut stream))
        .await
    {
        Ok(Ok(request)) => request,
        Ok(Err(AppError::Protocol { message })) => {
            // Malformed request: tell the client, keep the daemon serving.
            debug!("malformed request: {message}");
            let reply = DaemonResponse::error("unknown message");
            let _ = timeout(IO_TIMEOUT, protocol::write_frame(&mut stream, &reply)).await;
            return Ok(());
        }
        Ok(Err(e)) => return Err(e),
        Err(_) => return Err(AppError::ipc("client read timed out")),
    };

    let is_kill = matches!(request, DaemonRequest::Kill);

    let (reply_sender, reply_receiver) = oneshot::channel();
    events
        .send_async(DaemonEvent::Request {
            request,
            reply: reply_sender,
        })
        .await
        .map_err(|_| AppError::ipc("snackbar event loop is gone"))?;

    let response = reply_receiver
        .await
        .map_err(|_| AppError::ipc("snackbar event loop dropped the reply"))?;

    match timeout(IO_TIMEOUT, protocol::write_frame(&mut stream, &response)).await {
        Ok(result) => result?,
        Err(_) => return Err(AppError::ipc("client write timed out")),
    }

    // The kill reply is flushed before the listener goes away.
    if is_kill {
        let _ = shutdown.send_async(()).await;
    }

    Ok(())
}
