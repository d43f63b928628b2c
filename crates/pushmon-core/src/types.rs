//! Core types shared across the engine.
//!
//! This module defines the open input record ([`RawMonitorRecord`]), the
//! [`MonitorType`] tag, the location registries carried by
//! [`NormalizationContext`], and the per-record output
//! ([`NormalizedMonitorResult`]).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalizers::NormalizedMonitorFields;
use crate::version::ProductVersion;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One monitor definition exactly as the project push supplied it.
///
/// Keys may be dotted (`"ssl.verification_mode"`) or nested objects; both
/// address the same path. Anything that is not a JSON object becomes an empty
/// record, which later fails type resolution instead of panicking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub struct RawMonitorRecord(Map<String, Value>);

impl RawMonitorRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// The monitor's `id`, stringified; empty when absent.
    pub fn id(&self) -> String {
        match self.0.get("id") {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// The declared `type`, if it is a string.
    pub fn declared_type(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }
}

impl From<Value> for RawMonitorRecord {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }
}

impl From<RawMonitorRecord> for Value {
    fn from(record: RawMonitorRecord) -> Self {
        Value::Object(record.0)
    }
}

// ---------------------------------------------------------------------------
// Monitor type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MonitorType {
    Icmp,
    Tcp,
    Http,
    Browser,
}

static MONITOR_TYPES: phf::Map<&'static str, MonitorType> = phf::phf_map! {
    "icmp" => MonitorType::Icmp,
    "tcp" => MonitorType::Tcp,
    "http" => MonitorType::Http,
    "browser" => MonitorType::Browser,
};

impl MonitorType {
    pub const ALL: [MonitorType; 4] = [Self::Icmp, Self::Tcp, Self::Http, Self::Browser];

    /// Case-insensitive lookup of a declared type tag.
    pub fn parse(raw: &str) -> Option<Self> {
        MONITOR_TYPES.get(raw.trim().to_ascii_lowercase().as_str()).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Icmp => "icmp",
            Self::Tcp => "tcp",
            Self::Http => "http",
            Self::Browser => "browser",
        }
    }
}

impl std::fmt::Display for MonitorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geo {
    pub lat: f64,
    pub lon: f64,
}

/// A service-managed (public) location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub geo: Geo,
    #[serde(default)]
    pub url: String,
    #[serde(default = "service_managed")]
    pub is_service_managed: bool,
    #[serde(default = "default_status")]
    pub status: String,
}

fn service_managed() -> bool { true }
fn default_status() -> String { "ga".to_string() }

/// A location run by the customer's own agent policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateLocation {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub is_service_managed: bool,
    #[serde(default)]
    pub concurrent_monitors: u32,
    pub agent_policy_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
}

/// A resolved location as it appears in `normalizedFields.locations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MonitorLocation {
    Public(Location),
    Private(PrivateLocation),
}

// ---------------------------------------------------------------------------
// Context
// ---------------------------------------------------------------------------

/// Per-batch, read-only inputs shared by every record of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationContext {
    pub locations: Vec<Location>,
    pub private_locations: Vec<PrivateLocation>,
    pub project_id: String,
    pub namespace: String,
    pub product_version: ProductVersion,
}

impl NormalizationContext {
    pub fn new(
        project_id: impl Into<String>,
        namespace: impl Into<String>,
        product_version: ProductVersion,
    ) -> Self {
        Self {
            locations: Vec::new(),
            private_locations: Vec::new(),
            project_id: project_id.into(),
            namespace: namespace.into(),
            product_version,
        }
    }

    pub fn with_locations(mut self, locations: Vec<Location>) -> Self {
        self.locations = locations;
        self
    }

    pub fn with_private_locations(mut self, private_locations: Vec<PrivateLocation>) -> Self {
        self.private_locations = private_locations;
        self
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// How often a monitor runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub number: String,
    pub unit: ScheduleUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleUnit {
    #[serde(rename = "m")]
    Minutes,
    #[serde(rename = "s")]
    Seconds,
}

impl Default for Schedule {
    fn default() -> Self {
        Self { number: "3".to_string(), unit: ScheduleUnit::Minutes }
    }
}

/// A recoverable problem with one record, as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationError {
    pub id: String,
    pub reason: String,
    pub details: String,
}

/// The outcome for one input record. Results are parallel to the input batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedMonitorResult {
    pub errors: Vec<NormalizationError>,
    pub normalized_fields: NormalizedMonitorFields,
    pub unsupported_keys: Vec<String>,
}
