//! Fields every monitor type carries, plus the TLS and address-family blocks
//! shared by the lightweight types.

use serde::{Deserialize, Serialize};

use super::{FieldSource, RecordScope};
use crate::coerce;
use crate::types::{MonitorLocation, Schedule};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonFields {
    #[serde(rename = "type")]
    pub monitor_type: String,
    pub form_monitor_type: String,
    pub journey_id: String,
    pub name: String,
    pub enabled: bool,
    pub alert: AlertConfig,
    pub schedule: Schedule,
    pub tags: Vec<String>,
    pub timeout: Option<String>,
    pub locations: Vec<MonitorLocation>,
    pub namespace: String,
    pub original_space: String,
    pub custom_heartbeat_id: String,
    pub project_id: String,
    pub origin: String,
    pub config_id: String,
    #[serde(rename = "service.name")]
    pub service_name: String,
    pub hash: String,
    pub params: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    pub status: AlertStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertStatus {
    pub enabled: bool,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self { status: AlertStatus { enabled: true } }
    }
}

pub fn normalize(scope: &RecordScope<'_>, monitor_type: &str, form_monitor_type: &str) -> CommonFields {
    let source = &scope.source;
    let ctx = scope.ctx;

    let mut alert: AlertConfig = source.default_typed("alert");
    if let Some(enabled) = source.input("alert.status.enabled").as_ref().and_then(coerce::to_bool) {
        alert.status.enabled = enabled;
    }

    let public = coerce::resolve_locations(&source.input_list("locations"), &ctx.locations);
    let private = coerce::resolve_private_locations(
        &source.input_list("privateLocations"),
        &ctx.private_locations,
    );
    let locations = public
        .into_iter()
        .map(MonitorLocation::Public)
        .chain(private.into_iter().map(MonitorLocation::Private))
        .collect();

    CommonFields {
        monitor_type: monitor_type.to_string(),
        form_monitor_type: form_monitor_type.to_string(),
        journey_id: scope.id.clone(),
        name: source.text("name"),
        enabled: source.flag("enabled"),
        alert,
        schedule: source.typed("schedule"),
        tags: source.list("tags"),
        timeout: source.opt_text("timeout"),
        locations,
        namespace: coerce::sanitize_namespace(&ctx.namespace),
        original_space: ctx.namespace.clone(),
        custom_heartbeat_id: coerce::synthesize_heartbeat_id(&scope.id, &ctx.project_id, &ctx.namespace),
        project_id: ctx.project_id.clone(),
        origin: source.text("origin"),
        config_id: source.text("config_id"),
        service_name: source.text("service.name"),
        hash: source.text("hash"),
        params: source.text("params"),
    }
}

// ---------------------------------------------------------------------------
// TLS
// ---------------------------------------------------------------------------

const TLS_INPUTS: &[&str] = &[
    "ssl.certificate_authorities",
    "ssl.certificate",
    "ssl.key",
    "ssl.key_passphrase",
    "ssl.verification_mode",
    "ssl.supported_protocols",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TlsFields {
    #[serde(rename = "ssl.certificate_authorities")]
    pub certificate_authorities: String,
    #[serde(rename = "ssl.certificate")]
    pub certificate: String,
    #[serde(rename = "ssl.key")]
    pub key: String,
    #[serde(rename = "ssl.key_passphrase")]
    pub key_passphrase: String,
    #[serde(rename = "ssl.verification_mode")]
    pub verification_mode: String,
    #[serde(rename = "ssl.supported_protocols")]
    pub supported_protocols: Vec<String>,
    #[serde(rename = "__ui.is_tls_enabled")]
    pub is_tls_enabled: bool,
}

/// An absent block takes every default; any supplied `ssl.*` field marks TLS
/// as enabled and is kept exactly as given.
pub fn normalize_tls(source: &FieldSource<'_>) -> TlsFields {
    let supplied = TLS_INPUTS.iter().any(|path| source.supplied(path));
    TlsFields {
        certificate_authorities: source.text("ssl.certificate_authorities"),
        certificate: source.text("ssl.certificate"),
        key: source.text("ssl.key"),
        key_passphrase: source.text("ssl.key_passphrase"),
        verification_mode: source.text("ssl.verification_mode"),
        supported_protocols: source.list("ssl.supported_protocols"),
        is_tls_enabled: supplied || source.flag("__ui.is_tls_enabled"),
    }
}

// ---------------------------------------------------------------------------
// Address family
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpOptions {
    pub mode: String,
    pub ipv4: bool,
    pub ipv6: bool,
}

pub fn normalize_ip_options(source: &FieldSource<'_>) -> IpOptions {
    IpOptions {
        mode: source.text("mode"),
        ipv4: source.flag("ipv4"),
        ipv6: source.flag("ipv6"),
    }
}
