//! # Configuration
//!
//! Manages the loading and parsing of the bot's configuration file (`config.yaml`).
//! Defines the structs for the Matrix connection, rebuild steps and the price feed.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::domain::types::OperatingMode;

/// Main application configuration structure.
/// Matches the layout of `data/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub rebuild: RebuildConfig,
    #[serde(default)]
    pub ticker: TickerConfig,
}

/// Configuration for various connected services.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServicesConfig {
    #[serde(default)]
    pub matrix: MatrixConfig,
}

/// Specific configuration for the Matrix service.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct MatrixConfig {
    #[serde(default)]
    pub homeserver: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Room ID of the operating channel
    #[serde(default)]
    pub room: String,
}

impl MatrixConfig {
    pub fn has_credentials(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

/// System-level settings for the bot.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct SystemConfig {
    #[serde(default)]
    pub local: bool,
    /// Overrides the git tag discovered at startup
    #[serde(default)]
    pub version: Option<String>,
}

/// Settings for the `!build` command.
#[derive(Debug, Deserialize, Clone)]
pub struct RebuildConfig {
    #[serde(default = "default_workdir")]
    pub workdir: String,
    #[serde(default = "default_branch")]
    pub default_branch: String,
    #[serde(default = "default_build_command")]
    pub build_command: String,
    #[serde(default = "default_restart_command")]
    pub restart_command: String,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self {
            workdir: default_workdir(),
            default_branch: default_branch(),
            build_command: default_build_command(),
            restart_command: default_restart_command(),
        }
    }
}

fn default_workdir() -> String {
    ".".to_string()
}
fn default_branch() -> String {
    "master".to_string()
}
fn default_build_command() -> String {
    "cargo build --release".to_string()
}
fn default_restart_command() -> String {
    "./run.sh".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct TickerConfig {
    #[serde(default = "default_ticker_url")]
    pub url: String,
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            url: default_ticker_url(),
        }
    }
}

fn default_ticker_url() -> String {
    "https://api.coinbase.com/v2/prices/BTC-USD/spot".to_string()
}

impl AppConfig {
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context(crate::strings::messages::CONFIG_PARSE_ERROR)
    }

    /// Reads the config file. With `allow_missing`, an absent file yields the
    /// defaults, which carry no credentials and therefore select Local mode.
    pub fn load(path: &Path, allow_missing: bool) -> Result<Self> {
        if !path.exists() && allow_missing {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| crate::strings::messages::config_read_error(&path.display().to_string()))?;
        Self::from_yaml(&content)
    }

    /// Decides the operating mode. Local wins whenever it is requested or
    /// when there are no Matrix credentials to log in with.
    pub fn operating_mode(&self, cli_local: bool, env_local: bool) -> OperatingMode {
        if cli_local || env_local || self.system.local || !self.services.matrix.has_credentials() {
            OperatingMode::Local
        } else {
            OperatingMode::Live
        }
    }
}
