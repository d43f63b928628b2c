//! Domain-specific assertion macros for pushmon harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear which record and which wire key went wrong.

use pushmon::NormalizedMonitorResult;

// ---------------------------------------------------------------------------
// Wire-field assertions
// ---------------------------------------------------------------------------

/// Assert that a result's normalized fields carry a wire key with an
/// expected value.
///
/// ```rust
/// assert_wire_field!(result, "wait", "30");
/// assert_wire_field!(result, "schedule", { "number": "1", "unit": "m" });
/// ```
#[macro_export]
macro_rules! assert_wire_field {
    ($result:expr, $key:expr, $($value:tt)+) => {{
        let result: &pushmon::NormalizedMonitorResult = &$result;
        let key: &str = $key;
        let expected = serde_json::json!($($value)+);
        let wire = result.normalized_fields.to_wire();
        match wire.get(key) {
            Some(actual) if *actual == expected => {}
            Some(actual) => panic!(
                "assert_wire_field! failed:\n  normalizedFields[{:?}]\n  expected: {}\n  actual:   {}",
                key, expected, actual
            ),
            None => panic!(
                "assert_wire_field! failed: key {:?} not in normalizedFields.\n  Available: {:?}",
                key,
                wire.keys().collect::<Vec<_>>()
            ),
        }
    }};
}

// ---------------------------------------------------------------------------
// Error assertions
// ---------------------------------------------------------------------------

/// Assert that a result has no errors.
#[macro_export]
macro_rules! assert_no_errors {
    ($result:expr) => {{
        let result: &pushmon::NormalizedMonitorResult = &$result;
        if !result.errors.is_empty() {
            panic!("assert_no_errors! failed: {:#?}", result.errors);
        }
    }};
}

/// Assert that a result has an error with `reason` whose details contain
/// `fragment`.
///
/// ```rust
/// assert_has_error!(result, "Unsupported Heartbeat option", "Multiple hosts");
/// ```
#[macro_export]
macro_rules! assert_has_error {
    ($result:expr, $reason:expr, $fragment:expr) => {{
        let result: &pushmon::NormalizedMonitorResult = &$result;
        let reason: &str = $reason;
        let fragment: &str = $fragment;
        if !result
            .errors
            .iter()
            .any(|e| e.reason == reason && e.details.contains(fragment))
        {
            panic!(
                "assert_has_error! failed: no error with reason {:?} containing {:?}.\n  errors: {:#?}",
                reason, fragment, result.errors
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Non-macro helpers
// ---------------------------------------------------------------------------

/// Every result carries the full common block, whatever its type.
pub fn assert_common_block(result: &NormalizedMonitorResult) {
    let wire = result.normalized_fields.to_wire();
    for key in [
        "type",
        "form_monitor_type",
        "journey_id",
        "name",
        "enabled",
        "alert",
        "schedule",
        "tags",
        "timeout",
        "locations",
        "namespace",
        "original_space",
        "custom_heartbeat_id",
        "project_id",
        "origin",
        "config_id",
        "service.name",
        "hash",
        "params",
    ] {
        assert!(
            wire.contains_key(key),
            "common key {key:?} missing from normalizedFields: {:?}",
            wire.keys().collect::<Vec<_>>()
        );
    }
}

/// The wire map with every key that embeds record identity removed, for
/// comparing two normalizations of differently spelled records.
pub fn wire_without_identity(result: &NormalizedMonitorResult) -> serde_json::Map<String, serde_json::Value> {
    let mut wire = result.normalized_fields.to_wire();
    wire.remove("journey_id");
    wire.remove("custom_heartbeat_id");
    wire
}
