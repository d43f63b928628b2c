//! Type normalizers, one per [`MonitorType`], each producing a fully
//! populated, strongly typed field struct.
//!
//! Normalizers read the open input through a [`FieldSource`], which only
//! hands out values for paths the active schema recognizes, already coerced
//! to their canonical shape and falling back to the schema default.

pub mod browser;
pub mod common;
pub mod http;
pub mod icmp;
pub mod tcp;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::coerce;
use crate::error::MonitorError;
use crate::registry::{FieldSet, SchemaDefinition};
use crate::types::{MonitorType, NormalizationContext, RawMonitorRecord};

pub use browser::BrowserFields;
pub use common::{AlertConfig, CommonFields, IpOptions, TlsFields};
pub use http::{HttpFields, RequestBody};
pub use icmp::IcmpFields;
pub use tcp::TcpFields;

/// Canonical fields for one monitor, serialized as a flat map of wire keys.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedMonitorFields {
    Icmp(IcmpFields),
    Tcp(TcpFields),
    Http(HttpFields),
    Browser(BrowserFields),
    /// The record's type could not be resolved; only the common block is set.
    Unknown(CommonFields),
}

impl NormalizedMonitorFields {
    pub fn common(&self) -> &CommonFields {
        match self {
            Self::Icmp(fields) => &fields.common,
            Self::Tcp(fields) => &fields.common,
            Self::Http(fields) => &fields.common,
            Self::Browser(fields) => &fields.common,
            Self::Unknown(common) => common,
        }
    }

    pub fn monitor_type(&self) -> Option<MonitorType> {
        match self {
            Self::Icmp(_) => Some(MonitorType::Icmp),
            Self::Tcp(_) => Some(MonitorType::Tcp),
            Self::Http(_) => Some(MonitorType::Http),
            Self::Browser(_) => Some(MonitorType::Browser),
            Self::Unknown(_) => None,
        }
    }

    /// The flat wire-format map handed to persistence.
    pub fn to_wire(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// FieldSource
// ---------------------------------------------------------------------------

/// Schema-aware reader over one raw record.
#[derive(Debug, Clone, Copy)]
pub struct FieldSource<'a> {
    raw: &'a RawMonitorRecord,
    fields: &'a FieldSet,
}

impl<'a> FieldSource<'a> {
    pub fn new(raw: &'a RawMonitorRecord, fields: &'a FieldSet) -> Self {
        Self { raw, fields }
    }

    /// The coerced input value at `path`, if the schema accepts it and the
    /// record supplies something readable.
    pub fn input(&self, path: &str) -> Option<Value> {
        let spec = self.fields.input_field(path)?;
        let raw = self.spelled(path)?;
        coerce::apply(spec.coerce, &raw)
    }

    /// The record spells out `path` and the schema accepts it.
    pub fn supplied(&self, path: &str) -> bool {
        self.fields.input_field(path).is_some() && self.spelled(path).is_some_and(|v| !v.is_null())
    }

    /// Opaque paths also pick up dotted descendants such as
    /// `check.request.headers.Authorization`.
    fn spelled(&self, path: &str) -> Option<Value> {
        if self.fields.is_opaque(path) {
            coerce::gather(self.raw.fields(), path)
        } else {
            coerce::lookup(self.raw.fields(), path).cloned()
        }
    }

    fn resolved(&self, path: &str) -> Option<Value> {
        self.input(path).or_else(|| self.fields.default(path).cloned())
    }

    /// Value of `input_path` if supplied, else the default of `output_path`.
    fn resolved_as(&self, input_path: &str, output_path: &str) -> Option<Value> {
        self.input(input_path).or_else(|| self.fields.default(output_path).cloned())
    }

    pub fn text(&self, path: &str) -> String {
        self.opt_text(path).unwrap_or_default()
    }

    pub fn opt_text(&self, path: &str) -> Option<String> {
        self.resolved(path).as_ref().and_then(coerce::to_text)
    }

    pub fn text_as(&self, input_path: &str, output_path: &str) -> String {
        self.resolved_as(input_path, output_path)
            .as_ref()
            .and_then(coerce::to_text)
            .unwrap_or_default()
    }

    pub fn flag(&self, path: &str) -> bool {
        self.resolved(path).as_ref().and_then(coerce::to_bool).unwrap_or(false)
    }

    pub fn flag_as(&self, input_path: &str, output_path: &str) -> bool {
        self.resolved_as(input_path, output_path)
            .as_ref()
            .and_then(coerce::to_bool)
            .unwrap_or(false)
    }

    pub fn list(&self, path: &str) -> Vec<String> {
        coerce::to_string_array(self.resolved(path).as_ref())
    }

    /// Input-only list; empty when the record does not supply `path`.
    pub fn input_list(&self, path: &str) -> Vec<String> {
        coerce::to_string_array(self.input(path).as_ref())
    }

    pub fn object(&self, path: &str) -> Map<String, Value> {
        match self.resolved(path) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// Deserialize the resolved value at `path` into `T`, falling back to
    /// `T::default()` when neither input nor default fits.
    pub fn typed<T: DeserializeOwned + Default>(&self, path: &str) -> T {
        self.resolved(path)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    /// The schema default at `path` as `T`, ignoring any input.
    pub fn default_typed<T: DeserializeOwned + Default>(&self, path: &str) -> T {
        self.fields
            .default(path)
            .cloned()
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Per-record scope
// ---------------------------------------------------------------------------

/// Everything a type normalizer needs for one record.
pub struct RecordScope<'a> {
    pub source: FieldSource<'a>,
    pub ctx: &'a NormalizationContext,
    pub id: String,
    pub errors: Vec<MonitorError>,
}

impl<'a> RecordScope<'a> {
    pub fn new(raw: &'a RawMonitorRecord, fields: &'a FieldSet, ctx: &'a NormalizationContext) -> Self {
        Self {
            source: FieldSource::new(raw, fields),
            ctx,
            id: raw.id(),
            errors: Vec::new(),
        }
    }

    /// Keep the first of a single-target field (`hosts`, `urls`), reporting
    /// an error when more than one is supplied.
    pub fn single_target(&mut self, key: &str, monitor_type: MonitorType) -> String {
        let mut targets = self.source.input_list(key);
        if targets.len() > 1 {
            self.errors.push(MonitorError::multiple_targets(
                &self.id,
                key,
                monitor_type,
                &self.ctx.product_version,
            ));
        }
        if targets.is_empty() {
            self.source.text(key)
        } else {
            targets.swap_remove(0)
        }
    }
}

/// Run the normalizer for `monitor_type` against its schema.
pub fn normalize(
    monitor_type: MonitorType,
    raw: &RawMonitorRecord,
    ctx: &NormalizationContext,
    schema: &SchemaDefinition,
) -> (NormalizedMonitorFields, Vec<MonitorError>) {
    let mut scope = RecordScope::new(raw, schema.fields(), ctx);
    let fields = match monitor_type {
        MonitorType::Icmp => NormalizedMonitorFields::Icmp(icmp::normalize(&mut scope)),
        MonitorType::Tcp => NormalizedMonitorFields::Tcp(tcp::normalize(&mut scope)),
        MonitorType::Http => NormalizedMonitorFields::Http(http::normalize(&mut scope)),
        MonitorType::Browser => NormalizedMonitorFields::Browser(browser::normalize(&mut scope)),
    };
    (fields, scope.errors)
}

/// Common block only, for records whose type could not be resolved.
pub fn normalize_unknown(
    raw: &RawMonitorRecord,
    ctx: &NormalizationContext,
    common_fields: &FieldSet,
) -> NormalizedMonitorFields {
    let scope = RecordScope::new(raw, common_fields, ctx);
    let declared = raw.declared_type().unwrap_or_default();
    NormalizedMonitorFields::Unknown(common::normalize(&scope, declared, ""))
}
