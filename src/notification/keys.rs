//! Argument bag keys.
//!
//! Producers that publish through [`NotificationCenter::notify`] fill the bag
//! with these keys. Keys a category does not consume are ignored.
//!
//! [`NotificationCenter::notify`]: crate::notification::NotificationCenter::notify

pub const EXPERIMENT: &str = "experiment";
pub const VARIATION: &str = "variation";
pub const USER_ID: &str = "userId";
pub const ATTRIBUTES: &str = "attributes";
pub const EVENT_KEY: &str = "eventKey";
pub const LOG_EVENT_PARAMS: &str = "logEventParams";

// track
pub const EVENT_TAGS: &str = "eventTags";

// isFeatureEnabled, and the keys found inside its feature info map
pub const FEATURE_SOURCE: &str = "featureSource";
pub const IS_ENABLED: &str = "isEnabled";
pub const FEATURE_INFO: &str = "featureInfo";
pub const EVENT: &str = "event";

// getEnabledFeatures
pub const ENABLED_FEATURES: &str = "enabledFeatures";

// getFeatureVariable, and the keys found inside its variable info map
pub const FEATURE_KEY: &str = "featureKey";
pub const VARIABLE_KEY: &str = "variableKey";
pub const VARIABLE_VALUE: &str = "variableValue";
pub const VARIABLE_TYPE: &str = "variableType";
pub const FEATURE_ENABLED: &str = "featureEnabled";
pub const FEATURE_ENABLED_SOURCE: &str = "featureEnabledSource";
pub const FEATURE_VARIABLE_INFO: &str = "featureVariableInfo";
