//! The notification center: a per-category registry of listeners and the
//! synchronous dispatcher that fans notifications out to them.
//!
//! # Thread Safety
//!
//! One mutex guards the listener tables, the id index and the id counter.
//! Mutations hold it for their whole duration. Dispatch only holds it long
//! enough to clone the listeners registered for the category, then releases it
//! before calling any of them. A dispatch therefore delivers to the listeners
//! that were registered when it started; a listener added or removed while a
//! dispatch is in flight (including from inside a listener) takes effect from
//! the next dispatch on.
//!
//! # Panic Safety
//!
//! Each listener call is wrapped in [`std::panic::catch_unwind`]. A panic is
//! reported to the configured [`ErrorHandler`] as
//! [`NotificationError::ListenerPanicked`] and the remaining listeners still
//! run. Catching does not bypass the process panic hook: unless the host
//! installs its own with [`std::panic::set_hook`], the default hook still
//! prints the panic message (and a backtrace under `RUST_BACKTRACE`) to stderr
//! before the error handler sees it.
//!
//! # Metrics
//!
//! The `notification_listeners{type}` gauge is published while the registry
//! lock is held, so concurrent mutations publish their counts in the order
//! they were applied.

use crate::config::NotificationConfig;
use crate::core::{ErrorHandler, ProjectConfig};
use crate::error_handler::LoggingErrorHandler;
use crate::notification::listener::Listener;
use crate::notification::payload::{
    ActivateNotification, GetEnabledFeaturesNotification, GetFeatureVariableNotification,
    IsFeatureEnabledNotification, Notification, NotificationArgs, TrackNotification,
};
use crate::notification::{ListenerId, NotificationError, NotificationType};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Listener storage guarded by the center's mutex.
#[derive(Default)]
struct Registry {
    /// Listeners per category, ordered by id (and therefore by registration).
    listeners: HashMap<NotificationType, BTreeMap<ListenerId, Listener>>,
    /// Index: listener id → category, so removal does not scan every table.
    index: HashMap<ListenerId, NotificationType>,
    /// The id the next registration receives. Never decreases.
    next_id: u64,
}

impl Registry {
    fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    fn count(&self, notification_type: NotificationType) -> usize {
        self.listeners
            .get(&notification_type)
            .map_or(0, BTreeMap::len)
    }
}

/// Dispatches typed notifications to the listeners registered for them.
///
/// A center is bound to one live [`ProjectConfig`] and lives as long as its
/// owner keeps it. It can be shared across threads behind an `Arc`.
pub struct NotificationCenter {
    project_config: Arc<ProjectConfig>,
    registry: Mutex<Registry>,
    error_handler: Arc<dyn ErrorHandler>,
    settings: NotificationConfig,
}

impl fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("revision", &self.project_config.revision)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl NotificationCenter {
    /// Creates a center with the default error handler and settings.
    ///
    /// Fails with [`NotificationError::InvalidConfig`] when no project
    /// configuration is given.
    pub fn new(project_config: Option<Arc<ProjectConfig>>) -> Result<Self, NotificationError> {
        let mut builder = Self::builder();
        if let Some(config) = project_config {
            builder = builder.project_config(config);
        }
        builder.build()
    }

    pub fn builder() -> NotificationCenterBuilder {
        NotificationCenterBuilder::default()
    }

    /// The project configuration this center was created for.
    pub fn project_config(&self) -> &Arc<ProjectConfig> {
        &self.project_config
    }

    pub fn add_activate_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ActivateNotification) + Send + Sync + 'static,
    {
        self.insert(Listener::Activate(Arc::new(listener)))
    }

    pub fn add_track_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&TrackNotification) + Send + Sync + 'static,
    {
        self.insert(Listener::Track(Arc::new(listener)))
    }

    pub fn add_feature_enabled_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&IsFeatureEnabledNotification) + Send + Sync + 'static,
    {
        self.insert(Listener::IsFeatureEnabled(Arc::new(listener)))
    }

    pub fn add_enabled_features_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&GetEnabledFeaturesNotification) + Send + Sync + 'static,
    {
        self.insert(Listener::GetEnabledFeatures(Arc::new(listener)))
    }

    pub fn add_feature_variable_listener<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&GetFeatureVariableNotification) + Send + Sync + 'static,
    {
        self.insert(Listener::GetFeatureVariable(Arc::new(listener)))
    }

    /// Registers an already-tagged listener under `notification_type`.
    ///
    /// Fails with [`NotificationError::InvalidListener`] if the listener's
    /// shape belongs to a different category. No id is consumed on failure.
    pub fn add_listener(
        &self,
        notification_type: NotificationType,
        listener: Listener,
    ) -> Result<ListenerId, NotificationError> {
        let actual = listener.notification_type();
        if actual != notification_type {
            let err = NotificationError::InvalidListener {
                expected: notification_type,
                actual,
            };
            self.error_handler.handle_error(&err);
            return Err(err);
        }
        Ok(self.insert(listener))
    }

    fn insert(&self, listener: Listener) -> ListenerId {
        let notification_type = listener.notification_type();
        let mut registry = self.lock();

        let id = ListenerId::from(registry.next_id);
        registry.next_id += 1;
        registry
            .listeners
            .entry(notification_type)
            .or_default()
            .insert(id, listener);
        registry.index.insert(id, notification_type);

        record_listener_gauge(notification_type, registry.count(notification_type));
        drop(registry);

        debug!(listener_id = %id, %notification_type, "Added notification listener");
        id
    }

    /// Removes the listener registered under `id`.
    ///
    /// Returns `true` if it existed. Unknown, already-removed and zero ids
    /// return `false`.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut registry = self.lock();
        let Some(notification_type) = registry.index.remove(&id) else {
            return false;
        };
        let removed = registry
            .listeners
            .get_mut(&notification_type)
            .and_then(|listeners| listeners.remove(&id))
            .is_some();
        record_listener_gauge(notification_type, registry.count(notification_type));
        drop(registry);

        debug!(listener_id = %id, %notification_type, "Removed notification listener");
        removed
    }

    /// Removes every listener registered under `notification_type`.
    ///
    /// Other categories and the id counter are left untouched.
    pub fn clear_listeners(&self, notification_type: NotificationType) {
        let mut registry = self.lock();
        let removed = registry
            .listeners
            .remove(&notification_type)
            .unwrap_or_default();
        for id in removed.keys() {
            registry.index.remove(id);
        }
        record_listener_gauge(notification_type, 0);
        drop(registry);

        debug!(%notification_type, removed = removed.len(), "Cleared notification listeners");
    }

    /// Removes every listener in every category. The id counter keeps going,
    /// so ids issued afterwards are still larger than any issued before.
    pub fn clear_all_listeners(&self) {
        let mut registry = self.lock();
        let removed = registry.index.len();
        registry.listeners.clear();
        registry.index.clear();
        for notification_type in NotificationType::ALL {
            record_listener_gauge(notification_type, 0);
        }
        drop(registry);

        debug!(removed, "Cleared all notification listeners");
    }

    pub fn listener_count(&self, notification_type: NotificationType) -> usize {
        self.lock().count(notification_type)
    }

    pub fn is_empty(&self) -> bool {
        self.lock().index.is_empty()
    }

    /// The id the next successful registration will receive.
    pub fn next_listener_id(&self) -> ListenerId {
        ListenerId::from(self.lock().next_id)
    }

    /// Delivers a typed notification to every listener of its category, in
    /// registration order. Returns once all of them have been called.
    pub fn send(&self, notification: impl Into<Notification>) {
        self.dispatch(&notification.into());
    }

    /// Delivers a notification described by an argument bag.
    ///
    /// The bag is reshaped into `notification_type`'s payload once, before any
    /// listener is called. If a key holds a value of the wrong type the error
    /// is reported to the error handler and nothing is delivered.
    pub fn notify(&self, notification_type: NotificationType, args: Option<&NotificationArgs>) {
        if self.listener_count(notification_type) == 0 {
            return;
        }
        match Notification::from_args(notification_type, args) {
            Ok(notification) => self.dispatch(&notification),
            Err(err) => self.error_handler.handle_error(&err),
        }
    }

    fn dispatch(&self, notification: &Notification) {
        let notification_type = notification.notification_type();
        let listeners = self.snapshot(notification_type);
        if listeners.is_empty() {
            return;
        }

        if self.settings.log_dispatch {
            info!(%notification_type, listeners = listeners.len(), "Dispatching notification");
        }
        metrics::counter!("notifications_sent_total", "type" => notification_type.as_str())
            .increment(1);

        for (id, listener) in listeners {
            let start = Instant::now();
            let result = panic::catch_unwind(AssertUnwindSafe(|| listener.invoke(notification)));
            let elapsed = start.elapsed();
            metrics::histogram!("notification_listener_duration_seconds", "type" => notification_type.as_str())
                .record(elapsed.as_secs_f64());

            let payload = match result {
                Ok(delivered) => {
                    // `insert` files every listener under its own category.
                    debug_assert!(delivered, "listener {id} is filed under the wrong category");
                    None
                }
                Err(payload) => Some(payload),
            };
            if let Some(payload) = payload {
                metrics::counter!("notification_listener_failures_total", "type" => notification_type.as_str())
                    .increment(1);
                self.error_handler
                    .handle_error(&NotificationError::ListenerPanicked {
                        id,
                        notification_type,
                        message: panic_message(payload.as_ref()),
                    });
                continue;
            }

            if let Some(threshold_ms) = self.settings.slow_listener_threshold_ms {
                if elapsed > Duration::from_millis(threshold_ms) {
                    warn!(
                        listener_id = %id,
                        %notification_type,
                        elapsed_ms = elapsed.as_millis() as u64,
                        threshold_ms,
                        "Slow notification listener"
                    );
                }
            }
        }
    }

    /// Clones the listeners of one category, in id order, under the lock.
    fn snapshot(&self, notification_type: NotificationType) -> Vec<(ListenerId, Listener)> {
        self.lock()
            .listeners
            .get(&notification_type)
            .map(|listeners| {
                listeners
                    .iter()
                    .map(|(id, listener)| (*id, listener.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    // Every mutation completes before the guard is released, so a poisoned
    // lock still holds consistent state.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn record_listener_gauge(notification_type: NotificationType, count: usize) {
    metrics::gauge!("notification_listeners", "type" => notification_type.as_str()).set(count as f64);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Wires a [`NotificationCenter`] to its collaborators.
#[derive(Default)]
pub struct NotificationCenterBuilder {
    project_config: Option<Arc<ProjectConfig>>,
    error_handler: Option<Arc<dyn ErrorHandler>>,
    settings: NotificationConfig,
}

impl NotificationCenterBuilder {
    pub fn project_config(mut self, project_config: Arc<ProjectConfig>) -> Self {
        self.project_config = Some(project_config);
        self
    }

    /// Overrides the default [`LoggingErrorHandler`].
    pub fn error_handler(mut self, error_handler: Arc<dyn ErrorHandler>) -> Self {
        self.error_handler = Some(error_handler);
        self
    }

    pub fn settings(mut self, settings: NotificationConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<NotificationCenter, NotificationError> {
        let project_config = self.project_config.ok_or(NotificationError::InvalidConfig)?;
        Ok(NotificationCenter {
            project_config,
            registry: Mutex::new(Registry::new()),
            error_handler: self
                .error_handler
                .unwrap_or_else(|| Arc::new(LoggingErrorHandler)),
            settings: self.settings,
        })
    }
}
