//! Code for the configuration of the application.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    render::{Theme, DEFAULT_CURRENCY},
    CostInputs,
};

/// The configuration of the application.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Currency code shown next to every amount.
    pub currency: String,

    /// Display theme. Detected from the terminal when unset.
    pub theme: Option<Theme>,

    /// Starting inputs for every estimate. Fields left out keep their
    /// built-in defaults.
    pub defaults: CostInputs,

    /// The configuration for the HTTP server.
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_owned(),
            theme: None,
            defaults: CostInputs::default(),
            server: ServerConfig::default(),
        }
    }
}

/// The configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// `host:port` to bind to.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_owned(),
        }
    }
}

impl Config {
    /// Parse a configuration from a toml file.
    pub fn from_file(file: &Path) -> Result<Self> {
        let config = std::fs::read_to_string(file).with_context(|| format!("reading config {}", file.display()))?;
        Self::from_str(&config).with_context(|| format!("parsing config {}", file.display()))
    }

    /// Parse a configuration from a toml string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(config: &str) -> Result<Self> {
        Ok(toml::from_str(config)?)
    }

    /// Parse `file` if it exists, otherwise use the defaults.
    pub fn load_or_default(file: &Path) -> Result<Self> {
        if file.exists() {
            tracing::debug!(path = %file.display(), "loading config");
            Self::from_file(file)
        } else {
            tracing::debug!(path = %file.display(), "no config file, using defaults");
            Ok(Self::default())
        }
    }

    /// The configured theme, or the one detected from the environment.
    pub fn theme(&self) -> Theme {
        self.theme.unwrap_or_else(Theme::detect)
    }
}
