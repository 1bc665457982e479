//! Typed, in-process notification dispatch.
//!
//! This module lets independent observers subscribe to the decisions the SDK
//! makes (activations, tracked events, feature flag and variable lookups).
//! Each category has its own payload record and listener shape, so a listener
//! only ever sees the notification it registered for. Producers publish either
//! a typed [`Notification`] or, for compatibility, a string-keyed argument bag
//! that is reshaped into the category's record before delivery.

pub mod center;
pub mod keys;
pub mod listener;
pub mod logging_listener;
pub mod payload;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use center::{NotificationCenter, NotificationCenterBuilder};
pub use listener::Listener;
pub use payload::{
    ActivateNotification, GetEnabledFeaturesNotification, GetFeatureVariableNotification,
    IsFeatureEnabledNotification, Notification, NotificationArgs, TrackNotification,
};

/// The closed set of notification categories a listener can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationType {
    Activate,
    Track,
    IsFeatureEnabled,
    GetEnabledFeatures,
    GetFeatureVariable,
}

impl NotificationType {
    /// Every category, in declaration order.
    pub const ALL: [NotificationType; 5] = [
        NotificationType::Activate,
        NotificationType::Track,
        NotificationType::IsFeatureEnabled,
        NotificationType::GetEnabledFeatures,
        NotificationType::GetFeatureVariable,
    ];

    /// The camelCase name used in replay files and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Activate => "activate",
            NotificationType::Track => "track",
            NotificationType::IsFeatureEnabled => "isFeatureEnabled",
            NotificationType::GetEnabledFeatures => "getEnabledFeatures",
            NotificationType::GetFeatureVariable => "getFeatureVariable",
        }
    }
}

impl fmt::Display for NotificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationType {
    type Err = NotificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| NotificationError::UnknownType(s.to_string()))
    }
}

/// Identifier handed back by every listener registration.
///
/// Identifiers start at 1, increase strictly for the lifetime of a center and
/// are never reused, even after the listener is removed or all listeners are
/// cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Returns the raw identifier value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ListenerId {
    fn from(id: u64) -> Self {
        ListenerId(id)
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotificationError {
    #[error("a notification center requires a live project configuration")]
    InvalidConfig,

    #[error("listener of type {actual} cannot be registered for {expected} notifications")]
    InvalidListener {
        expected: NotificationType,
        actual: NotificationType,
    },

    #[error("invalid argument '{key}' for {notification_type} notification: expected {expected}")]
    InvalidArgument {
        notification_type: NotificationType,
        key: &'static str,
        expected: &'static str,
    },

    #[error("listener {id} panicked while handling {notification_type} notification: {message}")]
    ListenerPanicked {
        id: ListenerId,
        notification_type: NotificationType,
        message: String,
    },

    #[error("unknown notification type '{0}'")]
    UnknownType(String),
}
