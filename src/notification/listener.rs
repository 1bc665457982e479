//! Listener shapes, one per notification category.

use crate::notification::payload::{
    ActivateNotification, GetEnabledFeaturesNotification, GetFeatureVariableNotification,
    IsFeatureEnabledNotification, Notification, TrackNotification,
};
use crate::notification::NotificationType;
use std::fmt;
use std::sync::Arc;

pub type ActivateListener = Arc<dyn Fn(&ActivateNotification) + Send + Sync>;
pub type TrackListener = Arc<dyn Fn(&TrackNotification) + Send + Sync>;
pub type FeatureEnabledListener = Arc<dyn Fn(&IsFeatureEnabledNotification) + Send + Sync>;
pub type GetEnabledFeaturesListener = Arc<dyn Fn(&GetEnabledFeaturesNotification) + Send + Sync>;
pub type GetFeatureVariableListener = Arc<dyn Fn(&GetFeatureVariableNotification) + Send + Sync>;

/// A registered callback, tagged with the category whose payload it accepts.
#[derive(Clone)]
pub enum Listener {
    Activate(ActivateListener),
    Track(TrackListener),
    IsFeatureEnabled(FeatureEnabledListener),
    GetEnabledFeatures(GetEnabledFeaturesListener),
    GetFeatureVariable(GetFeatureVariableListener),
}

impl Listener {
    /// The category this listener can be registered under.
    pub fn notification_type(&self) -> NotificationType {
        match self {
            Listener::Activate(_) => NotificationType::Activate,
            Listener::Track(_) => NotificationType::Track,
            Listener::IsFeatureEnabled(_) => NotificationType::IsFeatureEnabled,
            Listener::GetEnabledFeatures(_) => NotificationType::GetEnabledFeatures,
            Listener::GetFeatureVariable(_) => NotificationType::GetFeatureVariable,
        }
    }

    /// Calls the listener if `notification` matches its shape.
    ///
    /// Returns `false` without calling anything on a category mismatch.
    pub(crate) fn invoke(&self, notification: &Notification) -> bool {
        match (self, notification) {
            (Listener::Activate(f), Notification::Activate(n)) => f(n),
            (Listener::Track(f), Notification::Track(n)) => f(n),
            (Listener::IsFeatureEnabled(f), Notification::IsFeatureEnabled(n)) => f(n),
            (Listener::GetEnabledFeatures(f), Notification::GetEnabledFeatures(n)) => f(n),
            (Listener::GetFeatureVariable(f), Notification::GetFeatureVariable(n)) => f(n),
            _ => return false,
        }
        true
    }
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Listener")
            .field(&self.notification_type())
            .finish()
    }
}
