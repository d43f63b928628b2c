//! Unsupported-key detector. Flattens a raw record into dot-joined leaf
//! paths and reports the ones the active schema does not recognize.

use serde_json::{Map, Value};

use crate::registry::SchemaDefinition;
use crate::types::RawMonitorRecord;

/// Unrecognized leaf paths of `raw`, in first-seen input order.
///
/// Objects are descended into; arrays, scalars, and anything under an opaque
/// path are leaves. Empty objects contribute nothing.
pub fn detect(raw: &RawMonitorRecord, schema: &SchemaDefinition) -> Vec<String> {
    let mut leaves = Vec::new();
    flatten_into(raw.fields(), "", schema, &mut leaves);

    let mut unsupported: Vec<String> = Vec::new();
    for path in leaves {
        if !schema.is_recognized(&path) && !unsupported.contains(&path) {
            unsupported.push(path);
        }
    }
    unsupported
}

fn flatten_into(
    map: &Map<String, Value>,
    prefix: &str,
    schema: &SchemaDefinition,
    out: &mut Vec<String>,
) {
    for (key, value) in map {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(nested) if !schema.fields().is_opaque(&path) => {
                flatten_into(nested, &path, schema, out);
            }
            _ => out.push(path),
        }
    }
}
