//! CLI context shared by all command handlers
//!
//! Resolves the socket and config paths once, up front, so handlers never
//! reach for defaults themselves.

use crate::config::Config;
use crate::daemon::create_socket_path;
use anyhow::Result;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;

use super::handlers::daemon::DETACHED_ENV;

const LOG_FILE: &str = "snackd.log";

/// Resolved paths and flags for one CLI invocation.
pub struct CliContext {
    pub socket_path: PathBuf,
    pub config_path: PathBuf,
    /// Whether `--config` was given explicitly. A reload only forwards the
    /// path when the caller actually named one; otherwise the daemon
    /// re-reads its own.
    pub config_overridden: bool,
    pub verbose: bool,
}

impl CliContext {
    pub fn new(
        socket: Option<PathBuf>,
        config: Option<PathBuf>,
        verbose: bool,
    ) -> Result<Self> {
        let socket_path = match socket {
            Some(path) => path,
            None => create_socket_path()?,
        };

        let config_overridden = config.is_some();
        let config_path = match config {
            Some(path) => path,
            None => Config::default_path()?,
        };

        Ok(Self {
            socket_path,
            config_path,
            config_overridden,
            verbose,
        })
    }

    /// Initialize the tracing subscriber.
    ///
    /// A detached daemon child logs to a file under the snackd directory;
    /// everything else logs to stderr. The returned guard must be kept
    /// alive for the life of the process so buffered log lines get
    /// flushed.
    pub fn init_logging(&self) -> Result<Option<WorkerGuard>> {
        let level = if self.verbose { "debug" } else { "info" };
        let filter = tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(level.parse().unwrap_or_else(|_| {
                tracing::Level::INFO.into()
            }));

        if std::env::var(DETACHED_ENV).is_ok() {
            let dir = crate::config::snackd_dir()?;
            std::fs::create_dir_all(&dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();

            Ok(Some(guard))
        } else {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();

            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_paths_are_kept() {
        let context = CliContext::new(
            Some(PathBuf::from("/tmp/test.sock")),
            Some(PathBuf::from("/tmp/test.toml")),
            false,
        )
        .unwrap();

        assert_eq!(context.socket_path, PathBuf::from("/tmp/test.sock"));
        assert_eq!(context.config_path, PathBuf::from("/tmp/test.toml"));
        assert!(context.config_overridden);
        assert!(!context.verbose);
    }

    #[test]
    fn test_default_config_is_not_an_override() {
        let context = CliContext::new(Some(PathBuf::from("/tmp/test.sock")), None, true).unwrap();

        assert!(!context.config_overridden);
        assert!(context.verbose);
    }
}
