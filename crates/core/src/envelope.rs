//! Response envelope unwrapping.
//!
//! The backing services disagree on response shape: some return a bare JSON
//! array, some wrap it as `{"orders": [...]}` or `{"data": [...]}`, and some
//! return a single object where a list was asked for. These helpers collapse
//! every observed shape into plain records so the rest of the crate never
//! sees an envelope.

use serde_json::Value;

/// Unwrap a list response into its records.
///
/// Accepts a bare array, an `orders`/`data` wrapper, or a lone object
/// (treated as a one-record list). `null` and scalar bodies yield an empty
/// list rather than an error; a missing list is reconciled as empty.
#[must_use]
pub fn records(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            if let Some(Value::Array(items)) = map.remove("orders") {
                return items;
            }
            if let Some(Value::Array(items)) = map.remove("data") {
                return items;
            }

            vec![Value::Object(map)]
        }
        _ => Vec::new(),
    }
}

/// Unwrap a single-record response.
///
/// Peels one `data` wrapper if present, takes the first element of an
/// accidental array, and returns `None` for anything that is not an object.
#[must_use]
pub fn record(body: Value) -> Option<Value> {
    match body {
        Value::Object(mut map) => {
            if let Some(inner @ Value::Object(_)) = map.remove("data") {
                return Some(inner);
            }

            Some(Value::Object(map))
        }
        Value::Array(items) => items.into_iter().find(Value::is_object),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_array_passes_through() {
        let body = json!([{"id": 1}, {"id": 2}]);

        assert_eq!(records(body).len(), 2);
    }

    #[test]
    fn orders_wrapper_is_unwrapped() {
        let body = json!({"orders": [{"id": 1}]});
        let items = records(body);

        assert_eq!(items.len(), 1);
        assert_eq!(items.first().and_then(|v| v.get("id")), Some(&json!(1)));
    }

    #[test]
    fn data_wrapper_is_unwrapped() {
        let body = json!({"data": [{"id": 7}, {"id": 8}], "count": 2});

        assert_eq!(records(body).len(), 2);
    }

    #[test]
    fn orders_wrapper_wins_over_data() {
        let body = json!({"orders": [{"id": 1}], "data": [{"id": 2}, {"id": 3}]});
        let items = records(body);

        assert_eq!(items.len(), 1);
        assert_eq!(items.first().and_then(|v| v.get("id")), Some(&json!(1)));
    }

    #[test]
    fn lone_object_becomes_single_record_list() {
        let body = json!({"id": 42, "status": "PENDING"});
        let items = records(body);

        assert_eq!(items.len(), 1);
    }

    #[test]
    fn null_and_scalars_reconcile_to_empty() {
        assert!(records(Value::Null).is_empty());
        assert!(records(json!("oops")).is_empty());
        assert!(records(json!(503)).is_empty());
    }

    #[test]
    fn single_record_peels_data_wrapper() {
        let body = json!({"data": {"id": 9, "name": "Asif"}});
        let rec = record(body).expect("record");

        assert_eq!(rec.get("name"), Some(&json!("Asif")));
    }

    #[test]
    fn single_record_from_accidental_array() {
        let body = json!([{"id": 9}]);

        assert!(record(body).is_some());
        assert!(record(json!([])).is_none());
    }

    #[test]
    fn single_record_rejects_scalars() {
        assert!(record(json!("gone")).is_none());
        assert!(record(Value::Null).is_none());
    }
}
