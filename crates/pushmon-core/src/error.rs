//! Error types.
//!
//! [`MonitorError`] is per-record and recoverable: it ends up in the
//! `errors` list of that record's result. [`RegistryError`] is a deployment
//! problem (bad registry document, no schema for a type/version) and aborts
//! the whole call.

use serde_json::Value;

use crate::types::{MonitorType, NormalizationError};
use crate::version::ProductVersion;

/// Reason label for options heartbeat cannot honour as given.
pub const UNSUPPORTED_OPTION_REASON: &str = "Unsupported Heartbeat option";
/// Reason label for records whose `type` has no normalizer.
pub const UNKNOWN_TYPE_REASON: &str = "Unsupported monitor type";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MonitorError {
    /// Multiple hosts/urls, or input paths the active schema does not know.
    #[error("{id}: {details}")]
    UnsupportedOption { id: String, details: String },

    #[error("{id}: {details}")]
    UnknownMonitorType { id: String, details: String },
}

impl MonitorError {
    pub fn multiple_targets(
        id: &str,
        key: &str,
        monitor_type: MonitorType,
        version: &ProductVersion,
    ) -> Self {
        let singular = key.strip_suffix('s').unwrap_or(key);
        Self::UnsupportedOption {
            id: id.to_string(),
            details: format!(
                "Multiple {key} are not supported for {monitor_type} project monitors in {version}. \
                 Please set only 1 {singular} per monitor."
            ),
        }
    }

    pub fn unsupported_keys(
        id: &str,
        keys: &[String],
        monitor_type: MonitorType,
        version: &ProductVersion,
    ) -> Self {
        Self::UnsupportedOption {
            id: id.to_string(),
            details: format!(
                "The following Heartbeat options are not supported for {monitor_type} project \
                 monitors in {version}: {}",
                keys.join("|")
            ),
        }
    }

    /// `declared` is the raw `type` value, if any.
    pub fn unknown_type(id: &str, declared: Option<&Value>, version: &ProductVersion) -> Self {
        let details = match declared {
            Some(Value::String(declared)) => format!(
                "Monitor type `{declared}` is not supported for project monitors in {version}. \
                 Supported types: {}.",
                MonitorType::ALL.map(MonitorType::as_str).join(", ")
            ),
            None | Some(Value::Null) => {
                format!("Monitor is missing a `type` field; it cannot be normalized in {version}.")
            }
            Some(other) => format!(
                "Monitor `type` must be a string, got `{other}`; it cannot be normalized in {version}."
            ),
        };
        Self::UnknownMonitorType { id: id.to_string(), details }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedOption { .. } => UNSUPPORTED_OPTION_REASON,
            Self::UnknownMonitorType { .. } => UNKNOWN_TYPE_REASON,
        }
    }
}

impl From<MonitorError> for NormalizationError {
    fn from(err: MonitorError) -> Self {
        let reason = err.reason().to_string();
        match err {
            MonitorError::UnsupportedOption { id, details }
            | MonitorError::UnknownMonitorType { id, details } => {
                NormalizationError { id, reason, details }
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("version `{raw}` is missing its {component} component")]
    Missing { raw: String, component: &'static str },

    #[error("version `{raw}` has a non-numeric {component} component")]
    NotNumeric { raw: String, component: &'static str },

    #[error("version `{raw}` has more than three components")]
    TooManyComponents { raw: String },
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to read schema registry document")]
    Load(#[from] config::ConfigError),

    #[error("schema registry document is malformed")]
    Malformed(#[from] serde_json::Error),

    #[error("schema entry declares unknown monitor type `{0}`")]
    UnknownType(String),

    #[error("schema entry for {monitor_type} has an invalid version")]
    InvalidVersion {
        monitor_type: MonitorType,
        #[source]
        source: VersionError,
    },

    #[error("schema entry for {monitor_type} has an empty range starting at {min}")]
    EmptyRange { monitor_type: MonitorType, min: ProductVersion },

    #[error("schema entries for {monitor_type} overlap: {first} and {second}")]
    OverlappingRanges { monitor_type: MonitorType, first: String, second: String },

    #[error("schema entry for {monitor_type} includes unknown fragment `{fragment}`")]
    UnknownFragment { monitor_type: MonitorType, fragment: String },

    #[error("schema registry has no `common` fragment")]
    MissingCommonFragment,

    #[error("schema entry for {monitor_type} {range} has no default for canonical field `{path}`")]
    MissingDefault { monitor_type: MonitorType, range: String, path: &'static str },

    #[error("no {monitor_type} schema covers product version {version}")]
    NoSchema { monitor_type: MonitorType, version: ProductVersion },
}
