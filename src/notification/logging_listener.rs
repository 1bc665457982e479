//! Listeners that log every notification they receive.
//!
//! These subscribe to all categories and are useful for validating a
//! notification pipeline and for debugging.

use crate::notification::{ListenerId, NotificationCenter};
use tracing::{info, instrument};

/// Registers one logging listener per category and returns their ids, in
/// category declaration order.
#[instrument(skip_all)]
pub fn register(center: &NotificationCenter) -> Vec<ListenerId> {
    let ids = vec![
        center.add_activate_listener(|n| {
            info!(
                experiment = %n.experiment.key,
                variation = %n.variation.key,
                user_id = %n.user_id,
                "Received activate notification"
            );
        }),
        center.add_track_listener(|n| {
            info!(
                event_key = %n.event_key,
                user_id = %n.user_id,
                event_tags = ?n.event_tags,
                "Received track notification"
            );
        }),
        center.add_feature_enabled_listener(|n| {
            info!(
                feature_key = %n.feature_key,
                user_id = %n.user_id,
                enabled = ?n.is_enabled(),
                source = ?n.feature_source(),
                "Received isFeatureEnabled notification"
            );
        }),
        center.add_enabled_features_listener(|n| {
            info!(
                user_id = %n.user_id,
                enabled_features = ?n.enabled_features,
                "Received getEnabledFeatures notification"
            );
        }),
        center.add_feature_variable_listener(|n| {
            info!(
                feature_key = %n.feature_key,
                variable_key = %n.variable_key,
                user_id = %n.user_id,
                value = ?n.variable_value(),
                "Received getFeatureVariable notification"
            );
        }),
    ];
    info!(count = ids.len(), "Logging listeners registered.");
    ids
}
