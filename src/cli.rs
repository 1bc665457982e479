//! Command-Line Interface (CLI) argument parsing.
//!
//! These arguments are parsed at startup and then merged over the
//! configuration file and environment variables.

use clap::Parser;
use figment::{
    value::{Dict, Map, Tag, Value},
    Error, Metadata, Profile, Provider,
};
use std::path::PathBuf;

/// Replays recorded SDK notifications through a notification center.
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to the project datafile (JSON).
    #[arg(long, value_name = "FILE")]
    pub datafile: PathBuf,

    /// Path to a JSON Lines file of notifications to replay.
    #[arg(long, value_name = "FILE")]
    pub replay: PathBuf,

    /// Logging level, e.g. `debug`.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Warn about listeners slower than this many milliseconds.
    #[arg(long, value_name = "MS")]
    pub slow_listener_ms: Option<u64>,

    /// Log every dispatch.
    #[arg(long)]
    pub log_dispatch: bool,
}

impl Provider for Cli {
    fn metadata(&self) -> Metadata {
        Metadata::named("Command-Line Arguments")
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict = Dict::new();

        if let Some(level) = &self.log_level {
            dict.insert("log_level".into(), Value::from(level.clone()));
        }

        let mut notifications = Dict::new();
        if let Some(ms) = self.slow_listener_ms {
            notifications.insert("slow_listener_threshold_ms".into(), Value::from(ms));
        }
        // Only an explicit flag overrides; absence keeps the file/env value.
        if self.log_dispatch {
            notifications.insert("log_dispatch".into(), Value::from(true));
        }
        if !notifications.is_empty() {
            dict.insert("notifications".into(), Value::Dict(Tag::Default, notifications));
        }

        let mut map = Map::new();
        map.insert(Profile::Default, dict);
        Ok(map)
    }
}
