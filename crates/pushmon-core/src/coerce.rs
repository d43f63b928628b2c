//! Shared field coercers.
//!
//! Every function here is total: any JSON value is accepted, and inputs that
//! cannot be read yield `None` (or the supplied default) instead of an error.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::registry::Coercion;
use crate::types::{Location, PrivateLocation, Schedule, ScheduleUnit};

fn duration_re() -> &'static Regex {
    static DURATION_RE: OnceLock<Regex> = OnceLock::new();
    DURATION_RE.get_or_init(|| {
        Regex::new(r"^(\d+)\s*([smhSMH]?)$").expect("valid duration regex")
    })
}

/// Split a `<digits><unit>` shorthand. `unit` is lowercase and may be empty.
fn split_shorthand(raw: &str) -> Option<(u64, char)> {
    let caps = duration_re().captures(raw.trim())?;
    let amount = caps.get(1)?.as_str().parse::<u64>().ok()?;
    let unit = caps
        .get(2)
        .and_then(|m| m.as_str().chars().next())
        .map(|c| c.to_ascii_lowercase())
        .unwrap_or(' ');
    Some((amount, unit))
}

fn whole_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Schedule / duration
// ---------------------------------------------------------------------------

/// `1` / `"1"` / `"1m"` → every minute; `"30s"` → every 30 seconds;
/// `"2h"` → every 120 minutes. Anything else is `None`.
pub fn parse_schedule(raw: &Value) -> Option<Schedule> {
    let (amount, unit) = match raw {
        Value::Number(_) => (whole_number(raw)?, ' '),
        Value::String(s) => split_shorthand(s)?,
        _ => return None,
    };
    let (number, unit) = match unit {
        ' ' | 'm' => (amount, ScheduleUnit::Minutes),
        's' => (amount, ScheduleUnit::Seconds),
        'h' => (amount.checked_mul(60)?, ScheduleUnit::Minutes),
        _ => return None,
    };
    Some(Schedule { number: number.to_string(), unit })
}

fn duration_seconds(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(_) => whole_number(raw),
        Value::String(s) => {
            let (amount, unit) = split_shorthand(s)?;
            let factor = match unit {
                ' ' | 's' => 1,
                'm' => 60,
                'h' => 3600,
                _ => return None,
            };
            amount.checked_mul(factor)
        }
        _ => None,
    }
}

/// Duration shorthand (`"30s"`, `"1m"`, `"1h"`, bare seconds) as whole seconds
/// in decimal. `None`, or anything unreadable, yields `default_seconds`.
pub fn parse_duration(raw: Option<&Value>, default_seconds: u64) -> String {
    raw.and_then(duration_seconds)
        .unwrap_or(default_seconds)
        .to_string()
}

// ---------------------------------------------------------------------------
// Scalars and lists
// ---------------------------------------------------------------------------

/// Scalars in their natural text form; arrays and objects as compact JSON.
pub fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => serde_json::to_string(other).ok(),
    }
}

/// Booleans, `"true"`/`"false"` (any case), and `0`/`1`.
pub fn to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => Some(true),
            "false" | "0" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        _ => None,
    }
}

/// An integer, or a string holding one, as a decimal string.
pub fn to_integer_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .map(|i| i.to_string()),
        Value::String(s) => s.trim().parse::<i64>().ok().map(|i| i.to_string()),
        _ => None,
    }
}

/// Arrays pass through (scalars stringified, nulls dropped); a string is
/// split on commas and trimmed; any other scalar becomes a single element.
pub fn to_string_array(raw: Option<&Value>) -> Vec<String> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter_map(to_text).collect(),
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        Some(other) => to_text(other).into_iter().collect(),
    }
}

/// Strings pass through; anything structured is serialized to JSON text.
pub fn to_json_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => serde_json::to_string(other).ok(),
    }
}

/// Apply a registry coercion to a raw value. `None` means "use the default".
pub fn apply(coercion: Coercion, raw: &Value) -> Option<Value> {
    match coercion {
        Coercion::Verbatim => (!raw.is_null()).then(|| raw.clone()),
        Coercion::Text => to_text(raw).map(Value::String),
        Coercion::Integer => to_integer_string(raw).map(Value::String),
        Coercion::Boolean => to_bool(raw).map(Value::Bool),
        Coercion::Duration => duration_seconds(raw).map(|secs| Value::String(secs.to_string())),
        Coercion::Schedule => parse_schedule(raw).and_then(|s| serde_json::to_value(s).ok()),
        Coercion::List => {
            (!raw.is_null()).then(|| Value::from(to_string_array(Some(raw))))
        }
        Coercion::Json => to_json_text(raw).map(Value::String),
    }
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub fn sanitize_namespace(raw: &str) -> String {
    raw.replace('-', "_")
}

/// `<monitor id>-<project id>-<namespace>`, with the namespace as supplied
/// (not sanitized).
pub fn synthesize_heartbeat_id(monitor_id: &str, project_id: &str, namespace: &str) -> String {
    format!("{monitor_id}-{project_id}-{namespace}")
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

/// Known public locations whose id appears in `raw_ids`, in `known` order.
/// Unmatched ids are dropped.
pub fn resolve_locations(raw_ids: &[String], known: &[Location]) -> Vec<Location> {
    known
        .iter()
        .filter(|location| raw_ids.iter().any(|id| *id == location.id))
        .cloned()
        .collect()
}

/// Known private locations referenced by id or by label (case-insensitive),
/// in `known` order.
pub fn resolve_private_locations(
    raw_refs: &[String],
    known: &[PrivateLocation],
) -> Vec<PrivateLocation> {
    known
        .iter()
        .filter(|location| {
            raw_refs.iter().any(|reference| {
                *reference == location.id || reference.eq_ignore_ascii_case(&location.label)
            })
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Key-path lookup
// ---------------------------------------------------------------------------

/// Find the value at a dot-joined `path`, whether the input spells it as one
/// dotted key, as nested objects, or any mix of the two. The longest literal
/// key wins when several spellings are present.
pub fn lookup<'a>(fields: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if let Some(value) = fields.get(path) {
        return Some(value);
    }
    path.char_indices()
        .rev()
        .filter(|(_, c)| *c == '.')
        .find_map(|(dot, _)| {
            let (head, tail) = (&path[..dot], &path[dot + 1..]);
            match fields.get(head) {
                Some(Value::Object(nested)) => lookup(nested, tail),
                _ => None,
            }
        })
}

/// Collect the value of an opaque `path` from every spelling of it: the
/// object at `path` itself plus any `<path>.<key>` literal keys, at any
/// nesting depth. Nested spellings are merged first; dotted descendants are
/// then added under their remaining key.
pub fn gather(fields: &Map<String, Value>, path: &str) -> Option<Value> {
    let mut found = None;
    let mut descendants = Map::new();
    for (key, value) in fields {
        if key == path {
            merge_object(&mut found, value.clone());
        } else if let Some(rest) = key.strip_prefix(path).and_then(|r| r.strip_prefix('.')) {
            descendants.insert(rest.to_string(), value.clone());
        } else if let (Some(tail), Value::Object(nested)) =
            (path.strip_prefix(key.as_str()).and_then(|t| t.strip_prefix('.')), value)
        {
            if let Some(inner) = gather(nested, tail) {
                merge_object(&mut found, inner);
            }
        }
    }

    if descendants.is_empty() {
        return found;
    }
    match found {
        None => Some(Value::Object(descendants)),
        Some(Value::Object(mut map)) => {
            map.extend(descendants);
            Some(Value::Object(map))
        }
        // A scalar spelled at the path itself wins over dotted descendants.
        scalar => scalar,
    }
}

fn merge_object(slot: &mut Option<Value>, value: Value) {
    match slot {
        Some(Value::Object(existing)) => {
            if let Value::Object(more) = value {
                existing.extend(more);
            }
        }
        Some(_) => {}
        None => *slot = Some(value),
    }
}
