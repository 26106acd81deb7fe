//! Helpers for reading duck-typed backend JSON.
//!
//! The services spell the same fact under several names (`user_id`,
//! `userId`, `customer.email`, ...). All of that tolerance is concentrated
//! here and in the `from_wire` constructors; canonical records never carry
//! alternate spellings further into the client.

use jiff::Timestamp;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::{ids::RecordId, money};

/// Look a key up on an object, following one level of `a.b` nesting.
pub(crate) fn lookup<'v>(value: &'v Value, key: &str) -> Option<&'v Value> {
    match key.split_once('.') {
        Some((head, tail)) => value.get(head).and_then(|inner| inner.get(tail)),
        None => value.get(key),
    }
}

/// First non-blank string under any of `keys`.
pub(crate) fn string_at(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_owned)
}

/// First resolvable identifier under any of `keys`.
pub(crate) fn id_at(value: &Value, keys: &[&str]) -> Option<RecordId> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find_map(RecordId::from_value)
}

/// First parseable amount under any of `keys`.
pub(crate) fn amount_at(value: &Value, keys: &[&str]) -> Option<Decimal> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find_map(money::from_wire)
}

/// First parseable RFC 3339 timestamp under any of `keys`.
pub(crate) fn timestamp_at(value: &Value, keys: &[&str]) -> Option<Timestamp> {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .filter_map(Value::as_str)
        .find_map(|s| s.trim().parse().ok())
}

/// Quantity under any of `keys`, clamped to at least 1 (missing or invalid
/// values count as a single unit, matching the order snapshots the client
/// itself produces).
pub(crate) fn qty_at(value: &Value, keys: &[&str]) -> u32 {
    keys.iter()
        .filter_map(|key| lookup(value, key))
        .find_map(|v| match v {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
        .map_or(1, crate::cart::clamp_qty)
}
