/// Notification Center - typed listener registry for an experimentation SDK
///
/// This library lets independent observers subscribe to the decisions an
/// experimentation client makes (activations, tracked events and feature flag
/// evaluations) and delivers each notification synchronously to every
/// listener registered for its category.
pub mod cli;
pub mod config;
pub mod core;
pub mod error_handler;
pub mod notification;
pub mod replay;

// Re-export core types for convenience
pub use crate::core::*;
pub use error_handler::{LoggingErrorHandler, NoOpErrorHandler};
pub use notification::{
    ListenerId, Notification, NotificationCenter, NotificationError, NotificationType,
};
