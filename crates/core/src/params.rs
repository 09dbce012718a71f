//! Typed lookups into a JSON parameter object.
//!
//! Each helper takes the params value, a key and a default. Missing keys and
//! values of the wrong JSON type fall back to the default, so an override
//! object only needs to name what it changes.

use std::ops::Range;

use serde_json::Value;

/// `params[name]` as `f64`; integers are accepted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// `params[name]` as `usize`; only non-negative integers are accepted.
pub fn param_usize(params: &Value, name: &str, default: usize) -> usize {
    params
        .get(name)
        .and_then(Value::as_u64)
        .and_then(|v| usize::try_from(v).ok())
        .unwrap_or(default)
}

/// `params[name]` as `bool`.
pub fn param_bool(params: &Value, name: &str, default: bool) -> bool {
    params.get(name).and_then(Value::as_bool).unwrap_or(default)
}

/// `params[name]` as a range, written either `[start, end]` or
/// `{"start": .., "end": ..}`.
///
/// Anything else (wrong arity, non-numbers) yields the default. Ordering is
/// not checked here.
pub fn param_range(params: &Value, name: &str, default: Range<f64>) -> Range<f64> {
    let Some(value) = params.get(name) else {
        return default;
    };
    let bounds = match value {
        Value::Array(items) if items.len() == 2 => items[0].as_f64().zip(items[1].as_f64()),
        Value::Object(map) => map
            .get("start")
            .and_then(Value::as_f64)
            .zip(map.get("end").and_then(Value::as_f64)),
        _ => None,
    };
    bounds.map(|(start, end)| start..end).unwrap_or(default)
}
