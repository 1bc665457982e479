#![allow(dead_code)]
pub mod captured_logs;
pub mod test_metrics;

use notification_center::core::{ErrorHandler, ProjectConfig};
use notification_center::notification::{NotificationCenter, NotificationError};
use std::sync::{Arc, Mutex};

/// An `ErrorHandler` that records every error it receives.
#[derive(Debug, Default)]
pub struct RecordingErrorHandler {
    errors: Mutex<Vec<NotificationError>>,
}

impl RecordingErrorHandler {
    pub fn errors(&self) -> Vec<NotificationError> {
        self.errors.lock().unwrap().clone()
    }
}

impl ErrorHandler for RecordingErrorHandler {
    fn handle_error(&self, error: &NotificationError) {
        self.errors.lock().unwrap().push(error.clone());
    }
}

pub fn project_config() -> Arc<ProjectConfig> {
    Arc::new(ProjectConfig {
        account_id: "12001".to_string(),
        project_id: "111001".to_string(),
        revision: "42".to_string(),
        version: "4".to_string(),
        ..Default::default()
    })
}

/// Creates a center whose errors are captured by the returned handler.
pub fn center_with_recorder() -> (NotificationCenter, Arc<RecordingErrorHandler>) {
    let handler = Arc::new(RecordingErrorHandler::default());
    let center = NotificationCenter::builder()
        .project_config(project_config())
        .error_handler(handler.clone())
        .build()
        .unwrap();
    (center, handler)
}

/// A shared, ordered log of which listener saw what.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.calls.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}
