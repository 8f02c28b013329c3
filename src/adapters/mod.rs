//! Upstream provider clients.
//!
//! Each client normalizes its provider's payloads at the boundary: raw JSON
//! is decoded field-by-field into partially-optional structs, and nothing
//! untyped crosses into the aggregation engine.

pub mod espn;
pub mod sleeper;

pub use espn::EspnClient;
pub use sleeper::SleeperClient;

use serde_json::Value;

/// First present string among `keys`
pub(crate) fn pick_str<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| root.get(*key)?.as_str())
}

/// First present value among `keys`
pub(crate) fn pick_obj<'a>(root: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| root.get(*key))
}

/// Provider ids arrive as either strings or numbers depending on endpoint
pub(crate) fn pick_id(root: &Value, keys: &[&str]) -> Option<String> {
    pick_obj(root, keys).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
