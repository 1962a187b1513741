//! Socket path for daemon communication

use crate::errors::{AppError, AppResult};
use std::path::PathBuf;

const SOCKET_FILE: &str = "daemon.sock";

/// Default socket location, `<config dir>/snackd/daemon.sock`. Creates the
/// parent directory so both daemon and client can resolve it.
pub fn create_socket_path() -> AppResult<PathBuf> {
    let dir = crate::config::snackd_dir()?;

    std::fs::create_dir_all(&dir)
        .map_err(|e| AppError::socket_with_source(&dir, "failed to create socket directory", e))?;

    Ok(dir.join(SOCKET_FILE))
}
