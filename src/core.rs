//! Core domain types and service traits for the notification center
//!
//! This module defines the project configuration the center is bound to,
//! the experiment and variation records carried by activate notifications,
//! and the error handling contract used to report dispatch failures.

use crate::notification::NotificationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// User attributes passed alongside a decision, keyed by attribute name.
pub type Attributes = Map<String, Value>;

/// Tags attached to a tracked conversion event (e.g. `revenue`, `value`).
pub type EventTags = Map<String, Value>;

/// The impression or conversion event record produced for a decision.
pub type LogEvent = Map<String, Value>;

/// The active project configuration, as produced from a datafile.
///
/// The notification center treats this as opaque; it only requires that one
/// exists before listeners can be registered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectConfig {
    pub account_id: String,
    pub project_id: String,
    pub revision: String,
    pub version: String,
    pub experiments: Vec<Experiment>,
    pub feature_flags: Vec<FeatureFlag>,
}

impl ProjectConfig {
    /// Reads a project configuration from a JSON datafile.
    pub fn from_datafile<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path.as_ref())?;
        let config = serde_json::from_slice(&bytes)?;
        Ok(config)
    }
}

/// An experiment a user can be activated into.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Experiment {
    pub id: String,
    pub key: String,
    pub status: String,
    pub layer_id: String,
    pub variations: Vec<Variation>,
}

/// A single variation of an experiment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Variation {
    pub id: String,
    pub key: String,
    pub feature_enabled: Option<bool>,
}

/// A feature flag and the experiments that gate it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlag {
    pub id: String,
    pub key: String,
    pub experiment_ids: Vec<String>,
}

// =============================================================================
// Service Traits
// =============================================================================

/// Receives errors that the notification center cannot surface to a caller.
///
/// Dispatch is fire-and-forget, so a panicking listener or a malformed
/// argument bag is reported here instead of being returned.
pub trait ErrorHandler: Send + Sync {
    /// Handles a single error raised during registration or dispatch.
    fn handle_error(&self, error: &NotificationError);
}
