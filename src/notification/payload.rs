//! Per-category notification payloads and argument bag reshaping.

use crate::core::{Attributes, EventTags, Experiment, LogEvent, Variation};
use crate::notification::{keys, NotificationError, NotificationType};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

/// Untyped key/value payload accepted by [`NotificationCenter::notify`].
///
/// [`NotificationCenter::notify`]: crate::notification::NotificationCenter::notify
pub type NotificationArgs = Map<String, Value>;

/// Sent after a user is activated into an experiment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ActivateNotification {
    pub experiment: Experiment,
    pub user_id: String,
    pub attributes: Option<Attributes>,
    pub variation: Variation,
    pub event: LogEvent,
}

/// Sent after a conversion event is tracked.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackNotification {
    pub event_key: String,
    pub user_id: String,
    pub attributes: Option<Attributes>,
    pub event_tags: Option<EventTags>,
    pub event: LogEvent,
}

/// Sent after a single feature flag is evaluated for a user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IsFeatureEnabledNotification {
    pub feature_key: String,
    pub user_id: String,
    pub attributes: Option<Attributes>,
    pub feature_info: Option<Map<String, Value>>,
}

impl IsFeatureEnabledNotification {
    /// Whether the feature was enabled, as recorded in the feature info.
    pub fn is_enabled(&self) -> Option<bool> {
        info_value(&self.feature_info, keys::IS_ENABLED).and_then(Value::as_bool)
    }

    /// Where the decision came from (e.g. `"rollout"` or `"experiment"`).
    pub fn feature_source(&self) -> Option<&str> {
        info_value(&self.feature_info, keys::FEATURE_SOURCE).and_then(Value::as_str)
    }

    /// The impression event dispatched for the decision, if any.
    pub fn event(&self) -> Option<&Value> {
        info_value(&self.feature_info, keys::EVENT)
    }
}

/// Sent after all enabled features are computed for a user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GetEnabledFeaturesNotification {
    pub user_id: String,
    pub attributes: Option<Attributes>,
    pub enabled_features: Option<Vec<String>>,
}

/// Sent after a feature variable is resolved for a user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GetFeatureVariableNotification {
    pub feature_key: String,
    pub variable_key: String,
    pub user_id: String,
    pub attributes: Option<Attributes>,
    pub feature_variable_info: Option<Map<String, Value>>,
}

impl GetFeatureVariableNotification {
    pub fn variable_value(&self) -> Option<&Value> {
        info_value(&self.feature_variable_info, keys::VARIABLE_VALUE)
    }

    pub fn variable_type(&self) -> Option<&str> {
        info_value(&self.feature_variable_info, keys::VARIABLE_TYPE).and_then(Value::as_str)
    }

    pub fn feature_enabled(&self) -> Option<bool> {
        info_value(&self.feature_variable_info, keys::FEATURE_ENABLED).and_then(Value::as_bool)
    }

    pub fn feature_enabled_source(&self) -> Option<&str> {
        info_value(&self.feature_variable_info, keys::FEATURE_ENABLED_SOURCE)
            .and_then(Value::as_str)
    }
}

fn info_value<'a>(info: &'a Option<Map<String, Value>>, key: &str) -> Option<&'a Value> {
    info.as_ref().and_then(|map| map.get(key))
}

/// A notification of any category, carrying that category's payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Activate(ActivateNotification),
    Track(TrackNotification),
    IsFeatureEnabled(IsFeatureEnabledNotification),
    GetEnabledFeatures(GetEnabledFeaturesNotification),
    GetFeatureVariable(GetFeatureVariableNotification),
}

impl Notification {
    pub fn notification_type(&self) -> NotificationType {
        match self {
            Notification::Activate(_) => NotificationType::Activate,
            Notification::Track(_) => NotificationType::Track,
            Notification::IsFeatureEnabled(_) => NotificationType::IsFeatureEnabled,
            Notification::GetEnabledFeatures(_) => NotificationType::GetEnabledFeatures,
            Notification::GetFeatureVariable(_) => NotificationType::GetFeatureVariable,
        }
    }

    /// Reshapes an argument bag into the payload for `notification_type`.
    ///
    /// A missing bag behaves like an empty one. Missing required keys degrade
    /// to empty values and missing optional keys to `None`; only a key holding
    /// a value of the wrong JSON type is an error.
    pub fn from_args(
        notification_type: NotificationType,
        args: Option<&NotificationArgs>,
    ) -> Result<Self, NotificationError> {
        let empty = NotificationArgs::new();
        let reader = ArgReader {
            notification_type,
            args: args.unwrap_or(&empty),
        };

        let notification = match notification_type {
            NotificationType::Activate => Notification::Activate(ActivateNotification {
                experiment: reader.required_record(keys::EXPERIMENT, "an experiment object")?,
                user_id: reader.required_string(keys::USER_ID)?,
                attributes: reader.optional_map(keys::ATTRIBUTES)?,
                variation: reader.required_record(keys::VARIATION, "a variation object")?,
                event: reader.required_map(keys::LOG_EVENT_PARAMS)?,
            }),
            NotificationType::Track => Notification::Track(TrackNotification {
                event_key: reader.required_string(keys::EVENT_KEY)?,
                user_id: reader.required_string(keys::USER_ID)?,
                attributes: reader.optional_map(keys::ATTRIBUTES)?,
                event_tags: reader.optional_map(keys::EVENT_TAGS)?,
                event: reader.required_map(keys::LOG_EVENT_PARAMS)?,
            }),
            NotificationType::IsFeatureEnabled => {
                Notification::IsFeatureEnabled(IsFeatureEnabledNotification {
                    feature_key: reader.required_string(keys::FEATURE_KEY)?,
                    user_id: reader.required_string(keys::USER_ID)?,
                    attributes: reader.optional_map(keys::ATTRIBUTES)?,
                    feature_info: reader.optional_map(keys::FEATURE_INFO)?,
                })
            }
            NotificationType::GetEnabledFeatures => {
                Notification::GetEnabledFeatures(GetEnabledFeaturesNotification {
                    user_id: reader.required_string(keys::USER_ID)?,
                    attributes: reader.optional_map(keys::ATTRIBUTES)?,
                    enabled_features: reader.optional_string_list(keys::ENABLED_FEATURES)?,
                })
            }
            NotificationType::GetFeatureVariable => {
                Notification::GetFeatureVariable(GetFeatureVariableNotification {
                    feature_key: reader.required_string(keys::FEATURE_KEY)?,
                    variable_key: reader.required_string(keys::VARIABLE_KEY)?,
                    user_id: reader.required_string(keys::USER_ID)?,
                    attributes: reader.optional_map(keys::ATTRIBUTES)?,
                    feature_variable_info: reader.optional_map(keys::FEATURE_VARIABLE_INFO)?,
                })
            }
        };
        Ok(notification)
    }
}

impl From<ActivateNotification> for Notification {
    fn from(n: ActivateNotification) -> Self {
        Notification::Activate(n)
    }
}

impl From<TrackNotification> for Notification {
    fn from(n: TrackNotification) -> Self {
        Notification::Track(n)
    }
}

impl From<IsFeatureEnabledNotification> for Notification {
    fn from(n: IsFeatureEnabledNotification) -> Self {
        Notification::IsFeatureEnabled(n)
    }
}

impl From<GetEnabledFeaturesNotification> for Notification {
    fn from(n: GetEnabledFeaturesNotification) -> Self {
        Notification::GetEnabledFeatures(n)
    }
}

impl From<GetFeatureVariableNotification> for Notification {
    fn from(n: GetFeatureVariableNotification) -> Self {
        Notification::GetFeatureVariable(n)
    }
}

/// Typed lookups over an argument bag. JSON `null` counts as absent.
struct ArgReader<'a> {
    notification_type: NotificationType,
    args: &'a NotificationArgs,
}

impl ArgReader<'_> {
    fn get(&self, key: &str) -> Option<&Value> {
        self.args.get(key).filter(|value| !value.is_null())
    }

    fn invalid(&self, key: &'static str, expected: &'static str) -> NotificationError {
        NotificationError::InvalidArgument {
            notification_type: self.notification_type,
            key,
            expected,
        }
    }

    fn missing(&self, key: &'static str) {
        debug!(
            notification_type = %self.notification_type,
            key,
            "Required notification argument missing, using an empty value"
        );
    }

    fn required_string(&self, key: &'static str) -> Result<String, NotificationError> {
        match self.get(key) {
            None => {
                self.missing(key);
                Ok(String::new())
            }
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(self.invalid(key, "a string")),
        }
    }

    fn optional_map(&self, key: &'static str) -> Result<Option<Map<String, Value>>, NotificationError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(_) => Err(self.invalid(key, "an object")),
        }
    }

    fn required_map(&self, key: &'static str) -> Result<Map<String, Value>, NotificationError> {
        let map = self.optional_map(key)?;
        if map.is_none() {
            self.missing(key);
        }
        Ok(map.unwrap_or_default())
    }

    fn required_record<T>(&self, key: &'static str, expected: &'static str) -> Result<T, NotificationError>
    where
        T: DeserializeOwned + Default,
    {
        match self.get(key) {
            None => {
                self.missing(key);
                Ok(T::default())
            }
            Some(value @ Value::Object(_)) => {
                serde_json::from_value(value.clone()).map_err(|_| self.invalid(key, expected))
            }
            Some(_) => Err(self.invalid(key, expected)),
        }
    }

    fn optional_string_list(&self, key: &'static str) -> Result<Option<Vec<String>>, NotificationError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| self.invalid(key, "an array of strings"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(self.invalid(key, "an array of strings")),
        }
    }
}
