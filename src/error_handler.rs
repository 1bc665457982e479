//! Stock `ErrorHandler` implementations.

use crate::core::ErrorHandler;
use crate::notification::NotificationError;
use tracing::error;

/// An `ErrorHandler` that logs every error through `tracing`.
///
/// This is the handler a `NotificationCenter` uses unless another one is
/// supplied to the builder.
#[derive(Debug, Clone, Default)]
pub struct LoggingErrorHandler;

impl ErrorHandler for LoggingErrorHandler {
    fn handle_error(&self, err: &NotificationError) {
        match err {
            NotificationError::ListenerPanicked {
                id,
                notification_type,
                message,
            } => {
                error!(listener_id = %id, %notification_type, panic = %message, "Notification listener panicked");
            }
            other => {
                error!(error = %other, "Notification center error");
            }
        }
    }
}

/// An `ErrorHandler` that does nothing.
#[derive(Debug, Clone, Default)]
pub struct NoOpErrorHandler;

impl ErrorHandler for NoOpErrorHandler {
    fn handle_error(&self, _err: &NotificationError) {}
}
