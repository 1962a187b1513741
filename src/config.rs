//! Snackbar configuration
//!
//! The daemon is driven by three user-supplied shell commands plus an
//! ordered list of selectable options and an idle timeout. Configuration
//! is TOML on disk, loaded once at daemon startup and replaced wholesale
//! only by the daemon's own reload handling.

use crate::errors::{AppError, AppResult};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Substitution slot in `update_command`, replaced by the 0-based index of
/// the selected option.
pub const INDEX_SLOT: &str = "{index}";

const CONFIG_FILE: &str = "config.toml";

/// Snackbar daemon configuration
///
/// `update_command` carries one [`INDEX_SLOT`] substitution slot; the other
/// two commands are run verbatim. `options` is matched verbatim and
/// case-sensitively against the option a client sends — no trimming.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Idle timeout before the snackbar auto-closes, in milliseconds.
    pub timeout_ms: u64,
    /// Command run when the snackbar opens.
    pub open_command: String,
    /// Command run on every update; `{index}` is replaced by the option index.
    pub update_command: String,
    /// Command run when the snackbar closes (explicitly or on timeout).
    pub close_command: String,
    /// Ordered list of option names clients may select.
    pub options: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout_ms: 2000,
            open_command: "eww open snackbar".to_string(),
            update_command: "eww update snackbarIndex={index}".to_string(),
            close_command: "eww close snackbar".to_string(),
            options: vec![
                "volume".to_string(),
                "player".to_string(),
                "screenbrightness".to_string(),
                "powerprofiles".to_string(),
            ],
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path).map_err(|e| {
            AppError::config_with_source(format!("failed to read '{}'", path.display()), e)
        })?;

        let config: Config = toml::from_str(&raw).map_err(|e| {
            AppError::config_with_source(format!("failed to parse '{}'", path.display()), e)
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Check the invariants a loaded config must hold: the three commands
    /// and the option list are non-empty, and option names are unique.
    pub fn validate(&self) -> AppResult<()> {
        if self.open_command.is_empty() {
            return Err(AppError::config("`open_command` must not be empty"));
        }
        if self.update_command.is_empty() {
            return Err(AppError::config("`update_command` must not be empty"));
        }
        if self.close_command.is_empty() {
            return Err(AppError::config("`close_command` must not be empty"));
        }
        if self.options.is_empty() {
            return Err(AppError::config("`options` must not be empty"));
        }
        if self.options.iter().any(|option| option.is_empty()) {
            return Err(AppError::config("`options` entries must not be empty"));
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(AppError::config(format!(
                    "duplicate option '{option}' in `options`"
                )));
            }
        }

        Ok(())
    }

    /// Idle timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Position of `option` in the option list. Exact string match,
    /// case-sensitive, no trimming.
    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|o| o == option)
    }

    /// The update command with the index slot filled in.
    pub fn render_update_command(&self, index: usize) -> String {
        self.update_command.replace(INDEX_SLOT, &index.to_string())
    }

    /// Serialize to TOML, e.g. for `snackd generate-config`.
    pub fn to_toml(&self) -> AppResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| AppError::config_with_source("failed to serialize config", e))
    }

    /// Default config file location: `<config dir>/snackd/config.toml`.
    pub fn default_path() -> AppResult<PathBuf> {
        Ok(snackd_dir()?.join(CONFIG_FILE))
    }
}

/// Directory holding the config file, socket and daemon log, typically
/// `~/.config/snackd`.
pub(crate) fn snackd_dir() -> AppResult<PathBuf> {
    let base_dirs =
        BaseDirs::new().ok_or_else(|| AppError::config("failed to determine home directory"))?;
    Ok(base_dirs.config_dir().join("snackd"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout(), Duration::from_millis(2000));
    }

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let rendered = Config::default().to_toml().unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.options, Config::default().options);
        assert_eq!(parsed.timeout_ms, 2000);
    }

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
timeout_ms = 500
open_command = "open"
update_command = "update {index}"
close_command = "close"
options = ["a", "b"]
"#,
        );

        let config = Config::load(&path).unwrap();
        assert_eq!(config.timeout_ms, 500);
        assert_eq!(config.options, vec!["a", "b"]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(AppError::ConfigNotFound { .. })));
    }

    #[test]
    fn test_load_rejects_empty_options() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
timeout_ms = 500
open_command = "open"
update_command = "update {index}"
close_command = "close"
options = []
"#,
        );

        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_options() {
        let config = Config {
            options: vec!["volume".to_string(), "volume".to_string()],
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_option_index_is_exact_match() {
        let config = Config::default();
        assert_eq!(config.option_index("volume"), Some(0));
        assert_eq!(config.option_index("player"), Some(1));
        // Case and whitespace are significant.
        assert_eq!(config.option_index("Volume"), None);
        assert_eq!(config.option_index(" volume"), None);
        assert_eq!(config.option_index("volume "), None);
    }

    #[test]
    fn test_render_update_command() {
        let config = Config::default();
        assert_eq!(config.render_update_command(3), "eww update snackbarIndex=3");
    }
}
