//! Replays recorded notifications from a JSON Lines file.
//!
//! Each non-blank line is one record:
//!
//! ```text
//! {"type": "track", "args": {"eventKey": "purchase", "userId": "u1"}}
//! ```

use crate::notification::{NotificationArgs, NotificationCenter, NotificationType};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// A single recorded notification.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ReplayRecord {
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(default)]
    pub args: Option<NotificationArgs>,
}

/// Loads every record from `path`, failing on the first malformed line.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<ReplayRecord>> {
    let path = path.as_ref();
    info!("Loading replay records from {:?}", path);
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read replay file {}", path.display()))?;
    parse(&contents)
}

fn parse(contents: &str) -> Result<Vec<ReplayRecord>> {
    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let record: ReplayRecord = serde_json::from_str(line)
            .with_context(|| format!("invalid replay record on line {}", index + 1))?;
        records.push(record);
    }
    debug!("Parsed {} replay records.", records.len());
    Ok(records)
}

/// Sends each record through `center`, in file order, and returns how many
/// were sent.
pub fn run(center: &NotificationCenter, records: &[ReplayRecord]) -> usize {
    for record in records {
        center.notify(record.notification_type, record.args.as_ref());
    }
    records.len()
}
