//! Static monitor corpora used across harnesses.
//!
//! Each fixture is a JSON document of one monitor as a project push would
//! send it. `ALL_MONITORS` covers every type plus the awkward cases
//! (unknown type, non-object record).

use pushmon::RawMonitorRecord;

pub const ICMP_CLOUDFLARE: &str = r#"{
    "type": "icmp",
    "id": "Cloudflare-DNS",
    "hosts": ["1.1.1.1"],
    "schedule": 1,
    "tags": ["service:smtp", "org:google"],
    "timeout": "1m",
    "wait": "30s"
}"#;

pub const TCP_GMAIL_SMTP: &str = r#"{
    "type": "tcp",
    "id": "gmail-smtp",
    "name": "GMail SMTP",
    "hosts": ["smtp.gmail.com:587"],
    "schedule": 1,
    "tags": ["service:smtp", "org:google"],
    "locations": ["us_central"]
}"#;

pub const HTTP_LOGIN: &str = r#"{
    "type": "http",
    "id": "login-page",
    "name": "Login page",
    "urls": "https://app.example.com/login",
    "schedule": "10m",
    "max_redirects": 2,
    "check": {
        "request": {
            "method": "post",
            "headers": { "Content-Type": "application/json", "X-Trace": { "sampled": true } },
            "body": { "user": "synthetics" }
        },
        "response": { "status": [200, 302], "body": { "positive": ["Welcome"] } }
    },
    "ssl.verification_mode": "none"
}"#;

pub const BROWSER_CHECKOUT: &str = r#"{
    "type": "browser",
    "id": "checkout-journey",
    "name": "Checkout",
    "schedule": 15,
    "content": "UEsDBBQACAAIAAAAIQAAAAAAAAAAAAAAAAAQAAAAYmFzaWMuam91cm5leS50cw==",
    "playwrightOptions": { "headless": true, "ignoreHTTPSErrors": false },
    "throttling": { "download": 10, "upload": 2, "latency": 40 },
    "screenshot": "only-on-failure",
    "privateLocations": ["Office Lab"]
}"#;

pub const UNKNOWN_GRPC: &str = r#"{ "type": "grpc", "id": "rpc-health", "hosts": "rpc:50051" }"#;

pub const NOT_AN_OBJECT: &str = r#"["icmp", "1.1.1.1"]"#;

pub const ALL_MONITORS: &[&str] = &[
    ICMP_CLOUDFLARE,
    TCP_GMAIL_SMTP,
    HTTP_LOGIN,
    BROWSER_CHECKOUT,
    UNKNOWN_GRPC,
    NOT_AN_OBJECT,
];

/// Parse a fixture into a record; panics on malformed fixture JSON.
pub fn record(src: &str) -> RawMonitorRecord {
    serde_json::from_str(src).expect("fixture must be valid JSON")
}

pub fn all_records() -> Vec<RawMonitorRecord> {
    ALL_MONITORS.iter().map(|src| record(src)).collect()
}
