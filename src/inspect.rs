//! # Value Inspection
//!
//! Kind classification, zero-value checks, and magnitude extraction
//! over the internal value model.
//!
//! Every rule decision is kind-driven: rules look at what a value IS,
//! never at what field name it came from. The helpers here are the
//! single source of truth for those decisions so built-in and custom
//! rules agree on them.

use serde_json::Value;

/// Returns the kind name used in diagnostics.
pub(crate) fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

/// Shallow zero check: absent, empty, `0`, or `false`.
///
/// Sequences and mappings are zero when they hold no entries,
/// regardless of what their entries would look like.
pub(crate) fn is_zero(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Deep zero check for composite values: a composite is zero when
/// every field is recursively zero. Non-composites fall back to the
/// shallow check.
pub(crate) fn is_deep_zero(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.values().all(is_deep_zero),
        other => is_zero(other),
    }
}

/// The comparable size of a value, for bound rules.
///
/// Numbers compare by numeric value. A string that parses as a finite
/// number also compares by numeric value; any other string compares by
/// its character count. Sequences and mappings compare by entry count.
/// Booleans and null have no magnitude.
pub(crate) fn magnitude(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => match s.parse::<f64>() {
            Ok(n) if n.is_finite() => Some(n),
            _ => Some(s.chars().count() as f64),
        },
        Value::Array(items) => Some(items.len() as f64),
        Value::Object(map) => Some(map.len() as f64),
        Value::Bool(_) | Value::Null => None,
    }
}
