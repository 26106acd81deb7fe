//! Record identifiers.
//!
//! The backends disagree on how they spell identifiers: some emit JSON
//! numbers, some strings, some Mongo-style `_id` hashes. [`RecordId`]
//! normalizes all of them into one comparable form at the wire boundary so
//! the rest of the client never touches the raw variants again.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;

/// An opaque identifier as the backend services emit it.
///
/// Numbers are folded into their decimal string form, so `7` and `"7"`
/// compare equal. Comparison is exact (case-sensitive): identifiers are
/// opaque, only emails get case-insensitive treatment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    /// Create an identifier from a raw string, trimming surrounding
    /// whitespace. Returns `None` for blank input.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();

        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Extract an identifier from a JSON value: strings are trimmed,
    /// numbers rendered in decimal. Anything else resolves to `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Self::new(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Self(i.to_string()))
                } else if let Some(u) = n.as_u64() {
                    Some(Self(u.to_string()))
                } else {
                    n.as_f64().map(|f| Self(f.to_string()))
                }
            }
            _ => None,
        }
    }

    /// The normalized string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<u64> for RecordId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl de::Visitor<'_> for IdVisitor {
            type Value = RecordId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or numeric identifier")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                RecordId::new(v).ok_or_else(|| E::custom("identifier must not be blank"))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(RecordId::from(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(RecordId::from(v))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(RecordId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn numeric_and_string_forms_compare_equal() {
        let from_number = RecordId::from_value(&json!(7)).expect("numeric id");
        let from_string = RecordId::from_value(&json!("7")).expect("string id");

        assert_eq!(from_number, from_string);
    }

    #[test]
    fn strings_are_trimmed() {
        let id = RecordId::new("  abc-123  ").expect("id");

        assert_eq!(id.as_str(), "abc-123");
    }

    #[test]
    fn blank_and_non_scalar_values_resolve_to_none() {
        assert!(RecordId::new("   ").is_none());
        assert!(RecordId::from_value(&json!(null)).is_none());
        assert!(RecordId::from_value(&json!({"id": 1})).is_none());
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert_ne!(
            RecordId::new("Abc").expect("id"),
            RecordId::new("abc").expect("id")
        );
    }

    #[test]
    fn roundtrips_through_serde() {
        let id: RecordId = serde_json::from_value(json!(42)).expect("deserialize");

        assert_eq!(
            serde_json::to_value(&id).expect("serialize"),
            json!("42")
        );
    }
}
