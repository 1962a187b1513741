//! Wire protocol shared by the daemon server and client
//!
//! One request per connection, one reply back. Frames are a u32
//! little-endian length prefix followed by a bincode-encoded message;
//! both ends use the same codec so framing lives here and nowhere else.

use crate::errors::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Upper bound on a single frame. Requests and replies are tiny; anything
/// bigger is a confused or hostile peer.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Requests a client may send, one per connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DaemonRequest {
    /// Connectivity check.
    Ping,
    /// Open or refresh the snackbar with the named option.
    Update { option: String },
    /// Close the snackbar now; a no-op if it is already closed.
    Close,
    /// Re-read the config, from `config_path` or the daemon's current path.
    Reload { config_path: Option<PathBuf> },
    /// Stop the daemon after the reply is flushed.
    Kill,
}

/// Reply to any request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DaemonResponse {
    Ok { message: String },
    Error { message: String },
}

impl DaemonResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self::Ok {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Ok { message } | Self::Error { message } => message,
        }
    }
}

/// Write one length-prefixed frame and flush it.
pub async fn write_frame<W, T>(stream: &mut W, value: &T) -> AppResult<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let payload = bincode::serde::encode_to_vec(value, bincode::config::standard())
        .map_err(|e| AppError::ipc_with_source("failed to encode frame", e))?;

    let length = u32::try_from(payload.len())
        .map_err(|_| AppError::protocol(format!("frame too large: {} bytes", payload.len())))?;

    stream.write_all(&length.to_le_bytes()).await?;
    stream.write_all(&payload).await?;
    stream.flush().await?;

    Ok(())
}

/// Read one length-prefixed frame.
///
/// A length over [`MAX_FRAME_LEN`] or an undecodable payload comes back as
/// [`AppError::Protocol`]; plain I/O failures come back as [`AppError::Ipc`].
pub async fn read_frame<R, T>(stream: &mut R) -> AppResult<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut length_bytes = [0u8; 4];
    stream.read_exact(&mut length_bytes).await?;

    let length = u32::from_le_bytes(length_bytes) as usize;
    if length > MAX_FRAME_LEN {
        return Err(AppError::protocol(format!(
            "frame too large: {length} bytes"
        )));
    }

    let mut payload = vec![0u8; length];
    stream.read_exact(&mut payload).await?;

    let (value, _) = bincode::serde::decode_from_slice(&payload, bincode::config::standard())
        .map_err(|e| AppError::protocol(format!("failed to decode frame: {e}")))?;

    Ok(value)
}
