//! Error types for the snackd service
//!
//! One enum covers the error conditions the daemon and CLI can hit,
//! organized by functional domain. Only startup errors (config, bind)
//! are fatal; everything else stays scoped to a single connection.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // Configuration errors
    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    // Daemon / IPC errors
    #[error("daemon not running (no listener at '{path}')")]
    DaemonNotRunning { path: PathBuf },

    #[error("socket error at '{path}': {operation}")]
    Socket {
        path: PathBuf,
        operation: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("IPC error: {message}")]
    Ipc {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Malformed or unexpected bytes on the wire. Recoverable per
    /// connection: the peer gets an error reply and the daemon keeps
    /// serving.
    #[error("protocol error: {message}")]
    Protocol { message: String },
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn socket_with_source(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Socket {
            path: path.into(),
            operation: operation.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn ipc(message: impl Into<String>) -> Self {
        Self::Ipc {
            message: message.into(),
            source: None,
        }
    }

    pub fn ipc_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Ipc {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        let message = match err.kind() {
            std::io::ErrorKind::UnexpectedEof => "connection closed before a reply arrived",
            std::io::ErrorKind::ConnectionReset => "connection reset by peer",
            std::io::ErrorKind::TimedOut => "socket operation timed out",
            _ => "socket I/O failed",
        }
        .to_string();

        Self::Ipc {
            message,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AppError::config("missing field `options`");
        assert_eq!(
            err.to_string(),
            "configuration error: missing field `options`"
        );

        let err = AppError::protocol("frame too large");
        assert_eq!(err.to_string(), "protocol error: frame too large");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof");
        let app_err: AppError = io_err.into();

        match app_err {
            AppError::Ipc { message, .. } => {
                assert_eq!(message, "connection closed before a reply arrived");
            }
            _ => panic!("wrong error type"),
        }
    }
}
