//! One-shot IPC client
//!
//! Connect, send one request, read one reply, done. No retry and no
//! connection reuse; callers that want retries wrap this themselves.

use crate::daemon::protocol::{self, DaemonRequest, DaemonResponse};
use crate::errors::{AppError, AppResult};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::UnixStream;
use tokio::time::timeout;
use tracing::debug;

const IO_TIMEOUT: Duration = Duration::from_secs(5);

pub struct IpcClient {
    socket_path: PathBuf,
}

impl IpcClient {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Send one request and wait for its reply.
    ///
    /// A missing or dead socket maps to [`AppError::DaemonNotRunning`];
    /// a connection that drops before replying is a protocol error.
    pub async fn send(&self, request: DaemonRequest) -> AppResult<DaemonResponse> {
        debug!("sending request to {}", self.socket_path.display());

        let mut stream = match UnixStream::connect(&self.socket_path).await {
            Ok(stream) => stream,
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::ConnectionRefused) => {
                return Err(AppError::DaemonNotRunning {
                    path: self.socket_path.clone(),
                });
            }
            Err(e) => {
                return Err(AppError::socket_with_source(
                    &self.socket_path,
                    "failed to connect",
                    e,
                ));
            }
        };

        match timeout(IO_TIMEOUT, protocol::write_frame(&mut stream, &request)).await {
            Ok(result) => result?,
            Err(_) => return Err(AppError::ipc("request write timed out")),
        }

        let response = match timeout(IO_TIMEOUT, protocol::read_frame(&mut stream)).await {
            Ok(result) => result?,
            Err(_) => return Err(AppError::ipc("reply read timed out")),
        };

        Ok(response)
    }

    pub async fn ping(&self) -> AppResult<DaemonResponse> {
        self.send(DaemonRequest::Ping).await
    }

    pub async fn update(&self, option: impl Into<String>) -> AppResult<DaemonResponse> {
        self.send(DaemonRequest::Update {
            option: option.into(),
        })
        .await
    }

    pub async fn close(&self) -> AppResult<DaemonResponse> {
        self.send(DaemonRequest::Close).await
    }

    pub async fn reload(&self, config_path: Option<PathBuf>) -> AppResult<DaemonResponse> {
        self.send(DaemonRequest::Reload { config_path }).await
    }

    pub async fn kill(&self) -> AppResult<DaemonResponse> {
        self.send(DaemonRequest::Kill).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_socket_reports_daemon_not_running() {
        let dir = TempDir::new().unwrap();
        let client = IpcClient::new(dir.path().join("daemon.sock"));

        let result = client.ping().await;
        assert!(matches!(result, Err(AppError::DaemonNotRunning { .. })));
    }

    #[tokio::test]
    async fn test_stale_socket_file_reports_daemon_not_running() {
        // A socket file with no listener behind it refuses connections.
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daemon.sock");
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());

        let client = IpcClient::new(&path);
        let result = client.ping().await;
        assert!(matches!(result, Err(AppError::DaemonNotRunning { .. })));
    }
}
