//! Configuration management for the notification center
//!
//! This module defines the main `Config` struct and its sub-structs. It uses
//! the `figment` crate to layer built-in defaults, an optional TOML file,
//! `NOTIFICATION_CENTER_` environment variables and command-line arguments.

use crate::cli::Cli;
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// The main configuration struct for the application.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// The logging level (an `EnvFilter` directive such as `info` or `notification_center=debug`).
    pub log_level: String,
    /// Settings for notification dispatch.
    pub notifications: NotificationConfig,
}

/// Settings that shape how a `NotificationCenter` dispatches.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct NotificationConfig {
    /// Log every dispatch at `info` level.
    pub log_dispatch: bool,
    /// Log a warning when a single listener call takes longer than this.
    pub slow_listener_threshold_ms: Option<u64>,
}

impl Config {
    /// Loads the configuration, with later sources overriding earlier ones:
    /// defaults, the TOML file named by `--config`, environment, then `cli`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if let Some(path) = &cli.config {
            figment = figment.merge(Toml::file(path));
        }
        let config = figment
            // e.g. NOTIFICATION_CENTER_NOTIFICATIONS__LOG_DISPATCH=true
            .merge(Env::prefixed("NOTIFICATION_CENTER_").split("__"))
            .merge(cli.clone())
            .extract()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            notifications: NotificationConfig::default(),
        }
    }
}
