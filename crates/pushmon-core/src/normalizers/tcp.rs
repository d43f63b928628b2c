use serde::Serialize;

use super::common::{self, CommonFields, IpOptions, TlsFields};
use super::RecordScope;
use crate::types::MonitorType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TcpFields {
    #[serde(flatten)]
    pub common: CommonFields,
    pub hosts: String,
    #[serde(rename = "check.send")]
    pub check_send: String,
    #[serde(rename = "check.receive")]
    pub check_receive: String,
    pub proxy_url: String,
    pub proxy_use_local_resolver: bool,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(flatten)]
    pub ip: IpOptions,
}

pub fn normalize(scope: &mut RecordScope<'_>) -> TcpFields {
    let hosts = scope.single_target("hosts", MonitorType::Tcp);
    let source = &scope.source;
    TcpFields {
        common: common::normalize(scope, "tcp", "tcp"),
        hosts,
        check_send: source.text("check.send"),
        check_receive: source.text("check.receive"),
        proxy_url: source.text("proxy_url"),
        proxy_use_local_resolver: source.flag("proxy_use_local_resolver"),
        tls: common::normalize_tls(source),
        ip: common::normalize_ip_options(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use crate::registry::SchemaRegistry;
    use crate::types::{NormalizationContext, RawMonitorRecord};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(raw: serde_json::Value) -> (TcpFields, Vec<MonitorError>) {
        let raw = RawMonitorRecord::from(raw);
        let ctx = NormalizationContext::new("test-project-id", "test-space", "8.9.0".parse().unwrap());
        let schema = SchemaRegistry::builtin()
            .schema_for(MonitorType::Tcp, &ctx.product_version)
            .unwrap();
        let mut scope = RecordScope::new(&raw, schema.fields(), &ctx);
        let fields = normalize(&mut scope);
        (fields, scope.errors)
    }

    #[test]
    fn absent_tls_block_takes_defaults() {
        let (fields, errors) = run(json!({ "id": "gmail-smtp", "hosts": ["smtp.gmail.com:587"] }));
        assert!(errors.is_empty());
        assert_eq!(fields.tls.supported_protocols, vec!["TLSv1.1", "TLSv1.2", "TLSv1.3"]);
        assert_eq!(fields.tls.verification_mode, "full");
        assert!(!fields.tls.is_tls_enabled);
        assert_eq!(fields.proxy_url, "");
        assert!(!fields.proxy_use_local_resolver);
        assert_eq!(fields.check_send, "");
        assert_eq!(fields.check_receive, "");
        assert_eq!(fields.common.timeout.as_deref(), Some("16"));
    }

    #[test]
    fn explicit_protocol_list_is_preserved() {
        let (fields, _) = run(json!({
            "id": "gmail-smtp",
            "hosts": ["smtp.gmail.com:587"],
            "ssl.supported_protocols": ["TLSv1.2", "TLSv1.3"],
        }));
        assert_eq!(fields.tls.supported_protocols, vec!["TLSv1.2", "TLSv1.3"]);
        assert!(fields.tls.is_tls_enabled);
        assert_eq!(fields.tls.verification_mode, "full");
    }

    #[test]
    fn nested_ssl_block_is_read() {
        let (fields, _) = run(json!({
            "id": "m",
            "hosts": "db:5432",
            "ssl": { "verification_mode": "certificate", "supported_protocols": "TLSv1.3" },
        }));
        assert_eq!(fields.tls.verification_mode, "certificate");
        assert_eq!(fields.tls.supported_protocols, vec!["TLSv1.3"]);
    }

    #[test]
    fn payloads_and_proxy_pass_through() {
        let (fields, _) = run(json!({
            "id": "m",
            "hosts": "mail:25",
            "check": { "send": "HELO", "receive": "250" },
            "proxy_url": "socks5://proxy:1080",
            "proxy_use_local_resolver": "true",
        }));
        assert_eq!(fields.check_send, "HELO");
        assert_eq!(fields.check_receive, "250");
        assert_eq!(fields.proxy_url, "socks5://proxy:1080");
        assert!(fields.proxy_use_local_resolver);
    }

    #[test]
    fn multiple_hosts_reported() {
        let (fields, errors) = run(json!({ "id": "m", "hosts": ["a:1", "b:2"] }));
        assert_eq!(fields.hosts, "a:1");
        assert!(matches!(&errors[..], [MonitorError::UnsupportedOption { .. }]));
    }
}
