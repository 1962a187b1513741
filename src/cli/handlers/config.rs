//! Config generation handler

use crate::config::Config;
use anyhow::Result;

pub struct ConfigHandler;

impl ConfigHandler {
    pub fn new() -> Self {
        Self
    }

    /// Print a default config to stdout, ready to be redirected into
    /// `<config dir>/snackd/config.toml` and edited.
    pub fn handle_generate_config(&self) -> Result<()> {
        print!("{}", Config::default().to_toml()?);
        Ok(())
    }
}

impl Default for ConfigHandler {
    fn default() -> Self {
        Self::new()
    }
}
