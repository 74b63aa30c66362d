//! Server configuration.
//!
//! Sources, lowest precedence first: built-in defaults, a YAML file named by
//! `IPECHO_CONFIG`, then the `LISTEN` environment variable.

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var_os("IPECHO_CONFIG");
        let listen = std::env::var("LISTEN").ok();
        Self::load_from(path.as_deref().map(Path::new), listen)
    }

    /// Loads configuration from an optional YAML file, then applies a
    /// listen address override.
    pub fn load_from(path: Option<&Path>, listen: Option<String>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                Self::from_yaml(&content)
                    .with_context(|| format!("invalid config {}", path.display()))?
            }
            None => Self::default(),
        };

        if let Some(addr) = listen.filter(|a| !a.trim().is_empty()) {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }
}
