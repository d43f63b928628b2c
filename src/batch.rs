//! Batch files: one project push serialized as JSON.
//!
//! ```json
//! {
//!   "projectId": "synthetics-demo",
//!   "namespace": "default",
//!   "productVersion": "8.9.0",
//!   "locations": [{ "id": "us_central", "label": "US Central" }],
//!   "privateLocations": [],
//!   "monitors": [{ "type": "icmp", "id": "ping", "hosts": "1.1.1.1" }]
//! }
//! ```
//!
//! `namespace` and `productVersion` may be left out; the engine config fills
//! them in.

use std::path::Path;

use anyhow::Context;
use pushmon_core::config::EngineConfig;
use pushmon_core::{Location, NormalizationContext, PrivateLocation, ProductVersion, RawMonitorRecord};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchFile {
    pub project_id: String,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub product_version: Option<ProductVersion>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub private_locations: Vec<PrivateLocation>,
    #[serde(default)]
    pub monitors: Vec<RawMonitorRecord>,
}

/// Per-invocation overrides, typically from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct ContextOverrides {
    pub project_id: Option<String>,
    pub namespace: Option<String>,
    pub product_version: Option<ProductVersion>,
}

impl BatchFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let src = std::fs::read_to_string(path)
            .with_context(|| format!("reading batch file {}", path.display()))?;
        Self::parse(&src).with_context(|| format!("parsing batch file {}", path.display()))
    }

    pub fn parse(src: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(src)?)
    }

    /// Split into the records and the context they normalize under.
    /// Precedence: overrides, then the batch file, then `engine`.
    pub fn into_parts(
        self,
        overrides: ContextOverrides,
        engine: &EngineConfig,
    ) -> (Vec<RawMonitorRecord>, NormalizationContext) {
        let project_id = overrides.project_id.unwrap_or(self.project_id);
        let namespace = overrides
            .namespace
            .or(self.namespace)
            .unwrap_or_else(|| engine.namespace.clone());
        let version = overrides
            .product_version
            .or(self.product_version)
            .unwrap_or(engine.product_version);

        let ctx = NormalizationContext::new(project_id, namespace, version)
            .with_locations(self.locations)
            .with_private_locations(self.private_locations);
        (self.monitors, ctx)
    }
}
