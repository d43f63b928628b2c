//! Schema registry: which input paths each monitor type accepts at a given
//! product version, and how each canonical field is coerced and defaulted.
//!
//! The built-in registry is a TOML document embedded in the binary via
//! [`include_str!`] and parsed through the `config` crate, so an operator can
//! swap in a TOML, YAML or JSON override with [`SchemaRegistry::from_path`].
//! Every document is validated once at load; a bad document is a deployment
//! error, never a per-record one.
//!
//! # Document layout
//!
//! ```toml
//! [fragments.common]
//! fields = [{ path = "name", coerce = "text", default = "" }]
//! opaque = ["params"]
//!
//! [[schemas]]
//! type = "icmp"
//! min_version = "8.5.0"
//! max_version = "8.8.0"        # exclusive, optional
//! include = ["common", "icmp"]
//! fields = []                  # added after the fragments, overriding them
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::OnceLock;

use config::{Config, File, FileFormat};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::RegistryError;
use crate::types::MonitorType;
use crate::version::{ProductVersion, VersionRange};

const BUILTIN_REGISTRY_SRC: &str = include_str!("../schemas/registry.toml");

/// Name of the fragment used for records whose type cannot be resolved.
pub const COMMON_FRAGMENT: &str = "common";

// ---------------------------------------------------------------------------
// Canonical output fields that must carry a default
// ---------------------------------------------------------------------------

const COMMON_DEFAULTS: &[&str] = &[
    "name",
    "enabled",
    "schedule",
    "tags",
    "service.name",
    "hash",
    "params",
    "alert",
    "config_id",
    "origin",
];

const TLS_DEFAULTS: &[&str] = &[
    "ssl.certificate_authorities",
    "ssl.certificate",
    "ssl.key",
    "ssl.key_passphrase",
    "ssl.verification_mode",
    "ssl.supported_protocols",
    "__ui.is_tls_enabled",
];

const IP_DEFAULTS: &[&str] = &["mode", "ipv4", "ipv6"];

const ICMP_DEFAULTS: &[&str] = &["hosts", "timeout", "wait"];

const TCP_DEFAULTS: &[&str] = &[
    "hosts",
    "timeout",
    "check.send",
    "check.receive",
    "proxy_url",
    "proxy_use_local_resolver",
];

const HTTP_DEFAULTS: &[&str] = &[
    "urls",
    "timeout",
    "max_redirects",
    "check.request.method",
    "check.request.headers",
    "check.request.body",
    "check.response.status",
    "check.response.headers",
    "check.response.body.positive",
    "check.response.body.negative",
    "response.include_body",
    "response.include_headers",
    "username",
    "password",
    "proxy_url",
    "proxy_headers",
];

const BROWSER_DEFAULTS: &[&str] = &[
    "source.project.content",
    "playwright_options",
    "screenshots",
    "throttling",
    "ignore_https_errors",
    "filter_journeys.match",
    "filter_journeys.tags",
    "synthetics_args",
];

fn required_defaults(monitor_type: MonitorType) -> Vec<&'static str> {
    let groups: &[&[&'static str]] = match monitor_type {
        MonitorType::Icmp => &[COMMON_DEFAULTS, ICMP_DEFAULTS, IP_DEFAULTS],
        MonitorType::Tcp => &[COMMON_DEFAULTS, TCP_DEFAULTS, TLS_DEFAULTS, IP_DEFAULTS],
        MonitorType::Http => &[COMMON_DEFAULTS, HTTP_DEFAULTS, TLS_DEFAULTS, IP_DEFAULTS],
        MonitorType::Browser => &[COMMON_DEFAULTS, BROWSER_DEFAULTS],
    };
    groups.iter().flat_map(|group| group.iter().copied()).collect()
}

// ---------------------------------------------------------------------------
// Field rules
// ---------------------------------------------------------------------------

/// How a raw input value is turned into its canonical wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Coercion {
    #[default]
    Verbatim,
    Text,
    Integer,
    Boolean,
    Duration,
    Schedule,
    List,
    Json,
}

/// One known field path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub path: String,
    #[serde(default)]
    pub coerce: Coercion,
    /// Canonical value used when the input does not supply one.
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// `false` for output-only fields callers may not set.
    #[serde(default = "accepts_input")]
    pub input: bool,
}

fn accepts_input() -> bool { true }

// An explicit `null` default is still a default.
fn present<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Value::deserialize(deserializer).map(Some)
}

/// An ordered set of field rules plus the paths treated as opaque leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSet {
    specs: Vec<FieldSpec>,
    index: HashMap<String, usize>,
    opaque: Vec<String>,
}

impl FieldSet {
    fn empty() -> Self {
        Self { specs: Vec::new(), index: HashMap::new(), opaque: Vec::new() }
    }

    /// Add a rule; a rule for an existing path replaces it in place.
    fn insert(&mut self, spec: FieldSpec) {
        match self.index.get(&spec.path) {
            Some(&slot) => self.specs[slot] = spec,
            None => {
                self.index.insert(spec.path.clone(), self.specs.len());
                self.specs.push(spec);
            }
        }
    }

    fn add_opaque(&mut self, path: &str) {
        if !self.opaque.iter().any(|existing| existing == path) {
            self.opaque.push(path.to_string());
        }
    }

    fn extend(&mut self, other: &FieldSet) {
        for spec in &other.specs {
            self.insert(spec.clone());
        }
        for path in &other.opaque {
            self.add_opaque(path);
        }
    }

    pub fn field(&self, path: &str) -> Option<&FieldSpec> {
        self.index.get(path).map(|&slot| &self.specs[slot])
    }

    /// The rule for `path`, only if callers are allowed to set it.
    pub fn input_field(&self, path: &str) -> Option<&FieldSpec> {
        self.field(path).filter(|spec| spec.input)
    }

    pub fn default(&self, path: &str) -> Option<&Value> {
        self.field(path).and_then(|spec| spec.default.as_ref())
    }

    pub fn is_opaque(&self, path: &str) -> bool {
        self.opaque.iter().any(|opaque| opaque == path)
    }

    /// `true` if `path` is an input field, or lies below an opaque input field.
    pub fn is_recognized(&self, path: &str) -> bool {
        if self.input_field(path).is_some() {
            return true;
        }
        self.opaque.iter().any(|opaque| {
            path.strip_prefix(opaque.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
                && self.input_field(opaque).is_some()
        })
    }

    /// Input paths in declaration order.
    pub fn recognized_paths(&self) -> impl Iterator<Item = &str> {
        self.specs.iter().filter(|spec| spec.input).map(|spec| spec.path.as_str())
    }

    pub fn specs(&self) -> &[FieldSpec] {
        &self.specs
    }
}

/// The rules for one monitor type over one version range.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDefinition {
    pub monitor_type: MonitorType,
    pub range: VersionRange,
    fields: FieldSet,
}

impl SchemaDefinition {
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn field(&self, path: &str) -> Option<&FieldSpec> {
        self.fields.field(path)
    }

    pub fn default(&self, path: &str) -> Option<&Value> {
        self.fields.default(path)
    }

    pub fn is_recognized(&self, path: &str) -> bool {
        self.fields.is_recognized(path)
    }

    pub fn recognized_paths(&self) -> impl Iterator<Item = &str> {
        self.fields.recognized_paths()
    }
}

// ---------------------------------------------------------------------------
// Raw (serde) document, mirroring the TOML structure
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    fragments: BTreeMap<String, RawFieldSet>,
    #[serde(default)]
    schemas: Vec<RawSchema>,
}

#[derive(Debug, Deserialize)]
struct RawFieldSet {
    #[serde(default)]
    fields: Vec<FieldSpec>,
    #[serde(default)]
    opaque: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawSchema {
    #[serde(rename = "type")]
    monitor_type: String,
    min_version: String,
    #[serde(default)]
    max_version: Option<String>,
    #[serde(default)]
    include: Vec<String>,
    #[serde(default)]
    fields: Vec<FieldSpec>,
    #[serde(default)]
    opaque: Vec<String>,
}

impl RawFieldSet {
    fn build(&self) -> FieldSet {
        let mut set = FieldSet::empty();
        for spec in &self.fields {
            set.insert(spec.clone());
        }
        for path in &self.opaque {
            set.add_opaque(path);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Read-only, versioned schema table. Cheap to share by reference.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: Vec<SchemaDefinition>,
    common: FieldSet,
}

impl SchemaRegistry {
    /// The process-wide registry built from the embedded document.
    pub fn builtin() -> &'static SchemaRegistry {
        static BUILTIN: OnceLock<SchemaRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            Self::from_toml_str(BUILTIN_REGISTRY_SRC)
                .expect("built-in schema registry must be valid")
        })
    }

    pub fn from_toml_str(src: &str) -> Result<Self, RegistryError> {
        let config = Config::builder()
            .add_source(File::from_str(src, FileFormat::Toml))
            .build()?;
        Self::from_config(config)
    }

    /// Load a registry document from disk. The format follows the extension
    /// (`.toml`, `.yaml`, `.json`).
    pub fn from_path(path: &Path) -> Result<Self, RegistryError> {
        let config = Config::builder().add_source(File::from(path)).build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, RegistryError> {
        // Go through serde_json so field defaults keep their JSON shape.
        let value: Value = config.try_deserialize()?;
        let document: RawDocument = serde_json::from_value(value)?;
        Self::build(document)
    }

    fn build(document: RawDocument) -> Result<Self, RegistryError> {
        let fragments: BTreeMap<&str, FieldSet> = document
            .fragments
            .iter()
            .map(|(name, raw)| (name.as_str(), raw.build()))
            .collect();

        let common = fragments
            .get(COMMON_FRAGMENT)
            .cloned()
            .ok_or(RegistryError::MissingCommonFragment)?;

        let mut schemas: Vec<SchemaDefinition> = Vec::with_capacity(document.schemas.len());
        for raw in &document.schemas {
            let monitor_type = MonitorType::parse(&raw.monitor_type)
                .ok_or_else(|| RegistryError::UnknownType(raw.monitor_type.clone()))?;
            let range = parse_range(monitor_type, raw)?;

            let mut fields = FieldSet::empty();
            for name in &raw.include {
                let fragment = fragments.get(name.as_str()).ok_or_else(|| {
                    RegistryError::UnknownFragment { monitor_type, fragment: name.clone() }
                })?;
                fields.extend(fragment);
            }
            for spec in &raw.fields {
                fields.insert(spec.clone());
            }
            for path in &raw.opaque {
                fields.add_opaque(path);
            }

            if let Some(clash) = schemas
                .iter()
                .find(|existing| existing.monitor_type == monitor_type && existing.range.overlaps(&range))
            {
                return Err(RegistryError::OverlappingRanges {
                    monitor_type,
                    first: clash.range.to_string(),
                    second: range.to_string(),
                });
            }

            schemas.push(SchemaDefinition { monitor_type, range, fields });
        }

        for schema in &schemas {
            if let Some(path) = required_defaults(schema.monitor_type)
                .into_iter()
                .find(|path| schema.fields.default(path).is_none())
            {
                return Err(RegistryError::MissingDefault {
                    monitor_type: schema.monitor_type,
                    range: schema.range.to_string(),
                    path,
                });
            }
        }

        tracing::debug!(
            schemas = schemas.len(),
            fragments = fragments.len(),
            "schema registry loaded"
        );

        Ok(Self { schemas, common })
    }

    /// The schema whose range contains `version`.
    pub fn schema_for(
        &self,
        monitor_type: MonitorType,
        version: &ProductVersion,
    ) -> Result<&SchemaDefinition, RegistryError> {
        self.schemas
            .iter()
            .find(|schema| schema.monitor_type == monitor_type && schema.range.contains(version))
            .ok_or(RegistryError::NoSchema { monitor_type, version: *version })
    }

    /// Field rules shared by every type; used when a record's type is unknown.
    pub fn common(&self) -> &FieldSet {
        &self.common
    }

    pub fn schemas(&self) -> &[SchemaDefinition] {
        &self.schemas
    }
}

fn parse_range(monitor_type: MonitorType, raw: &RawSchema) -> Result<VersionRange, RegistryError> {
    let invalid = |source| RegistryError::InvalidVersion { monitor_type, source };
    let min: ProductVersion = raw.min_version.parse().map_err(invalid)?;
    let max = match &raw.max_version {
        Some(max) => Some(max.parse::<ProductVersion>().map_err(invalid)?),
        None => None,
    };
    if max.is_some_and(|max| max <= min) {
        return Err(RegistryError::EmptyRange { monitor_type, min });
    }
    Ok(VersionRange { min, max })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
