use serde::Serialize;

use super::common::{self, CommonFields, IpOptions};
use super::RecordScope;
use crate::types::MonitorType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IcmpFields {
    #[serde(flatten)]
    pub common: CommonFields,
    pub hosts: String,
    pub wait: String,
    #[serde(flatten)]
    pub ip: IpOptions,
}

pub fn normalize(scope: &mut RecordScope<'_>) -> IcmpFields {
    let hosts = scope.single_target("hosts", MonitorType::Icmp);
    let source = &scope.source;
    IcmpFields {
        common: common::normalize(scope, "icmp", "icmp"),
        hosts,
        wait: source.text("wait"),
        ip: common::normalize_ip_options(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MonitorError;
    use crate::registry::SchemaRegistry;
    use crate::types::{NormalizationContext, RawMonitorRecord, ScheduleUnit};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(raw: serde_json::Value, version: &str) -> (IcmpFields, Vec<MonitorError>) {
        let raw = RawMonitorRecord::from(raw);
        let ctx = NormalizationContext::new("test-project-id", "test-space", version.parse().unwrap());
        let schema = SchemaRegistry::builtin()
            .schema_for(MonitorType::Icmp, &ctx.product_version)
            .unwrap();
        let mut scope = RecordScope::new(&raw, schema.fields(), &ctx);
        let fields = normalize(&mut scope);
        (fields, scope.errors)
    }

    #[test]
    fn cloudflare_dns() {
        let (fields, errors) = run(
            json!({
                "type": "icmp",
                "id": "Cloudflare-DNS",
                "name": "Cloudflare DNS",
                "hosts": ["1.1.1.1"],
                "schedule": 1,
                "tags": ["service:smtp", "org:google"],
                "timeout": "1m",
                "wait": "30s",
            }),
            "8.9.0",
        );
        assert!(errors.is_empty());
        assert_eq!(fields.hosts, "1.1.1.1");
        assert_eq!(fields.common.timeout.as_deref(), Some("60"));
        assert_eq!(fields.wait, "30");
        assert_eq!(fields.common.schedule.number, "1");
        assert_eq!(fields.common.schedule.unit, ScheduleUnit::Minutes);
        assert_eq!(fields.common.tags, vec!["service:smtp", "org:google"]);
        assert_eq!(fields.common.name, "Cloudflare DNS");
    }

    #[test]
    fn missing_wait_and_timeout_use_defaults() {
        let (fields, _) = run(json!({ "id": "m", "hosts": "1.1.1.1" }), "8.9.0");
        assert_eq!(fields.wait, "1");
        assert_eq!(fields.common.timeout.as_deref(), Some("16"));
    }

    #[test]
    fn multiple_hosts_keep_the_first() {
        let (fields, errors) = run(json!({ "id": "m", "hosts": ["1.1.1.1", "2.2.2.2"] }), "8.9.0");
        assert_eq!(fields.hosts, "1.1.1.1");
        assert_eq!(errors.len(), 1);
        assert!(errors[0]
            .to_string()
            .contains("Multiple hosts are not supported for icmp project monitors in 8.9.0"));
    }

    #[test]
    fn comma_joined_hosts_count_as_multiple() {
        let (fields, errors) = run(json!({ "id": "m", "hosts": "1.1.1.1, 8.8.8.8" }), "8.9.0");
        assert_eq!(fields.hosts, "1.1.1.1");
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn ip_options_fixed_before_8_8() {
        let (old, _) = run(json!({ "id": "m", "hosts": "1.1.1.1", "ipv6": false }), "8.7.0");
        let (new, _) = run(json!({ "id": "m", "hosts": "1.1.1.1", "ipv6": false }), "8.8.0");
        assert!(old.ip.ipv6);
        assert!(!new.ip.ipv6);
    }
}
