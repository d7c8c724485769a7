//! Command-line overrides layered over the config file.
//!
//! Overrides are applied to the startup config and again to every config the
//! watcher reloads, so editing the file never undoes a `--root` or `--bind`.

use std::path::PathBuf;

use crate::config::schema::ServerConfig;

/// Settings given on the command line that win over the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub bind_address: Option<String>,
}

impl ConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.root.is_none() && self.bind_address.is_none()
    }

    /// Return `config` with every set override written into it.
    pub fn apply(&self, mut config: ServerConfig) -> ServerConfig {
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(bind_address) = &self.bind_address {
            config.listener.bind_address = bind_address.clone();
        }
        config
    }
}
