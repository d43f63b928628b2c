//! Test builders: ergonomic constructors for raw records and contexts.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use pushmon::{Location, NormalizationContext, PrivateLocation, RawMonitorRecord};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// RawMonitorBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`RawMonitorRecord`] fixtures. Keys are inserted in
/// call order, which is the order unsupported keys are reported in.
///
/// # Example
///
/// ```rust
/// let raw = RawMonitorBuilder::new("icmp", "Cloudflare-DNS")
///     .field("hosts", json!(["1.1.1.1"]))
///     .field("wait", "30s")
///     .build();
/// ```
pub struct RawMonitorBuilder {
    fields: Map<String, Value>,
}

impl RawMonitorBuilder {
    pub fn new(monitor_type: &str, id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("type".into(), Value::from(monitor_type));
        fields.insert("id".into(), Value::from(id));
        Self { fields }
    }

    /// A record with no `type` key.
    pub fn untyped(id: &str) -> Self {
        let mut fields = Map::new();
        fields.insert("id".into(), Value::from(id));
        Self { fields }
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> RawMonitorRecord {
        RawMonitorRecord::new(self.fields)
    }
}

// ---------------------------------------------------------------------------
// ContextBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`NormalizationContext`]. Defaults to project
/// `test-project-id`, namespace `test-space`, version `8.9.0`.
pub struct ContextBuilder {
    project_id: String,
    namespace: String,
    version: String,
    locations: Vec<Location>,
    private_locations: Vec<PrivateLocation>,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuilder {
    pub fn new() -> Self {
        Self {
            project_id: "test-project-id".into(),
            namespace: "test-space".into(),
            version: "8.9.0".into(),
            locations: Vec::new(),
            private_locations: Vec::new(),
        }
    }

    pub fn project_id(mut self, project_id: &str) -> Self {
        self.project_id = project_id.into();
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.into();
        self
    }

    pub fn location(mut self, id: &str, label: &str) -> Self {
        self.locations.push(Location {
            id: id.into(),
            label: label.into(),
            geo: Default::default(),
            url: format!("https://synthetics.example/{id}"),
            is_service_managed: true,
            status: "ga".into(),
        });
        self
    }

    pub fn private_location(mut self, id: &str, label: &str, agent_policy_id: &str) -> Self {
        self.private_locations.push(PrivateLocation {
            id: id.into(),
            label: label.into(),
            is_service_managed: false,
            concurrent_monitors: 1,
            agent_policy_id: agent_policy_id.into(),
            geo: None,
        });
        self
    }

    pub fn build(self) -> NormalizationContext {
        let version = self.version.parse().expect("test version must parse");
        NormalizationContext::new(self.project_id, self.namespace, version)
            .with_locations(self.locations)
            .with_private_locations(self.private_locations)
    }
}

/// The default harness context.
pub fn test_context() -> NormalizationContext {
    ContextBuilder::new().build()
}
