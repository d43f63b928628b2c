use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::common::{self, CommonFields, IpOptions, TlsFields};
use super::RecordScope;
use crate::coerce;
use crate::types::MonitorType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HttpFields {
    #[serde(flatten)]
    pub common: CommonFields,
    pub urls: String,
    pub max_redirects: String,
    #[serde(rename = "check.request.method")]
    pub request_method: String,
    #[serde(rename = "check.request.headers")]
    pub request_headers: Map<String, Value>,
    #[serde(rename = "check.request.body")]
    pub request_body: RequestBody,
    #[serde(rename = "check.response.status")]
    pub response_status: Vec<String>,
    #[serde(rename = "check.response.headers")]
    pub response_headers: Map<String, Value>,
    #[serde(rename = "check.response.body.positive")]
    pub response_body_positive: Vec<String>,
    #[serde(rename = "check.response.body.negative")]
    pub response_body_negative: Vec<String>,
    #[serde(rename = "response.include_body")]
    pub include_body: String,
    #[serde(rename = "response.include_headers")]
    pub include_headers: bool,
    pub username: String,
    pub password: String,
    pub proxy_url: String,
    pub proxy_headers: Map<String, Value>,
    #[serde(flatten)]
    pub tls: TlsFields,
    #[serde(flatten)]
    pub ip: IpOptions,
}

/// Request payload with its content type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

impl Default for RequestBody {
    fn default() -> Self {
        Self { kind: "text".to_string(), value: String::new() }
    }
}

impl RequestBody {
    /// A string is a text body; objects and arrays are JSON bodies. An object
    /// already shaped `{type, value}` is taken as-is.
    pub fn from_input(raw: &Value) -> Option<Self> {
        match raw {
            Value::Object(map) if is_typed_body(map) => serde_json::from_value(raw.clone()).ok(),
            Value::Object(_) | Value::Array(_) => Some(Self {
                kind: "json".to_string(),
                value: coerce::to_json_text(raw)?,
            }),
            other => Some(Self { kind: "text".to_string(), value: coerce::to_text(other)? }),
        }
    }
}

fn is_typed_body(map: &Map<String, Value>) -> bool {
    map.len() == 2
        && map.get("type").is_some_and(Value::is_string)
        && map.get("value").is_some_and(Value::is_string)
}

pub fn normalize(scope: &mut RecordScope<'_>) -> HttpFields {
    let urls = scope.single_target("urls", MonitorType::Http);
    let source = &scope.source;

    let request_body = source
        .input("check.request.body")
        .as_ref()
        .and_then(RequestBody::from_input)
        .unwrap_or_else(|| source.default_typed("check.request.body"));

    HttpFields {
        common: common::normalize(scope, "http", "http"),
        urls,
        max_redirects: source.text("max_redirects"),
        request_method: source.text("check.request.method").to_ascii_uppercase(),
        request_headers: source.object("check.request.headers"),
        request_body,
        response_status: source.list("check.response.status"),
        response_headers: source.object("check.response.headers"),
        response_body_positive: source.list("check.response.body.positive"),
        response_body_negative: source.list("check.response.body.negative"),
        include_body: source.text("response.include_body"),
        include_headers: source.flag("response.include_headers"),
        username: source.text("username"),
        password: source.text("password"),
        proxy_url: source.text("proxy_url"),
        proxy_headers: source.object("proxy_headers"),
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

    fn run(raw: Value) -> (HttpFields, Vec<MonitorError>) {
        let raw = RawMonitorRecord::from(raw);
        let ctx = NormalizationContext::new("test-project-id", "test-space", "8.9.0".parse().unwrap());
        let schema = SchemaRegistry::builtin()
            .schema_for(MonitorType::Http, &ctx.product_version)
            .unwrap();
        let mut scope = RecordScope::new(&raw, schema.fields(), &ctx);
        let fields = normalize(&mut scope);
        (fields, scope.errors)
    }

    #[test]
    fn defaults() {
        let (fields, errors) = run(json!({ "id": "home", "urls": "https://example.com" }));
        assert!(errors.is_empty());
        assert_eq!(fields.urls, "https://example.com");
        assert_eq!(fields.max_redirects, "0");
        assert_eq!(fields.request_method, "GET");
        assert_eq!(fields.request_body, RequestBody::default());
        assert!(fields.request_headers.is_empty());
        assert_eq!(fields.include_body, "on_error");
        assert!(fields.include_headers);
        assert_eq!(fields.tls.supported_protocols, vec!["TLSv1.1", "TLSv1.2", "TLSv1.3"]);
    }

    #[test]
    fn integers_become_strings() {
        let (fields, _) = run(json!({
            "id": "home",
            "urls": ["https://example.com"],
            "max_redirects": 3,
            "check.response.status": [200, 201],
        }));
        assert_eq!(fields.max_redirects, "3");
        assert_eq!(fields.response_status, vec!["200", "201"]);
    }

    #[test]
    fn request_block_is_read_from_nested_input() {
        let (fields, _) = run(json!({
            "id": "login",
            "urls": "https://example.com/login",
            "check": {
                "request": {
                    "method": "post",
                    "headers": { "Content-Type": "application/json" },
                    "body": { "user": "synthetics" },
                },
                "response": { "body": { "positive": "Welcome" } },
            },
        }));
        assert_eq!(fields.request_method, "POST");
        assert_eq!(fields.request_headers.get("Content-Type"), Some(&json!("application/json")));
        assert_eq!(
            fields.request_body,
            RequestBody { kind: "json".into(), value: r#"{"user":"synthetics"}"#.into() }
        );
        assert_eq!(fields.response_body_positive, vec!["Welcome"]);
    }

    #[test]
    fn text_and_typed_bodies() {
        assert_eq!(
            RequestBody::from_input(&json!("ping")),
            Some(RequestBody { kind: "text".into(), value: "ping".into() })
        );
        assert_eq!(
            RequestBody::from_input(&json!({ "type": "xml", "value": "<a/>" })),
            Some(RequestBody { kind: "xml".into(), value: "<a/>".into() })
        );
    }

    #[test]
    fn multiple_urls_reported() {
        let (fields, errors) = run(json!({
            "id": "home",
            "urls": ["https://a.example", "https://b.example"],
        }));
        assert_eq!(fields.urls, "https://a.example");
        assert_eq!(errors.len(), 1);
        assert!(errors[0].to_string().contains("Multiple urls are not supported for http"));
        assert!(errors[0].to_string().contains("Please set only 1 url per monitor"));
    }
}
