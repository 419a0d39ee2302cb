//! Dynamic credential attribute values.
//!
//! Credential subjects carry caller-supplied attribute bags whose shape is
//! not known ahead of time. Attributes are modeled as a tagged union over
//! the JSON value space, with insertion order preserved so the assembler's
//! "well-known keys first, then remainder" merge rule is stable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// An ordered mapping from attribute name to value.
pub type AttributeMap = IndexMap<String, AttributeValue>;

/// A single attribute value.
///
/// Serialized untagged, so attribute bags round-trip as plain JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    /// Explicit null.
    Null,

    /// Boolean value.
    Bool(bool),

    /// Numeric value (integer or float).
    Number(serde_json::Number),

    /// String value.
    String(String),

    /// List of values.
    List(Vec<AttributeValue>),

    /// Nested attribute map.
    Map(AttributeMap),
}

impl AttributeValue {
    /// Returns `true` if this value is an empty list.
    ///
    /// An empty list for a well-known key is treated as an absent key by
    /// the credential assembler.
    #[must_use]
    pub fn is_empty_list(&self) -> bool {
        matches!(self, Self::List(items) if items.is_empty())
    }

    /// Returns `true` if this value carries content worth emitting.
    ///
    /// Null and empty lists are considered absent.
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Self::Null) && !self.is_empty_list()
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(serde_json::Number::from(value))
    }
}

impl From<Vec<AttributeValue>> for AttributeValue {
    fn from(value: Vec<AttributeValue>) -> Self {
        Self::List(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_round_trip_preserves_shape() {
        let json = r#"{"name":[{"nameParts":[{"type":"GivenName","value":"Mary"}]}],"flag":true,"count":3}"#;
        let map: AttributeMap = serde_json::from_str(json).unwrap();

        assert!(matches!(map["name"], AttributeValue::List(_)));
        assert_eq!(map["flag"], AttributeValue::Bool(true));
        assert_eq!(serde_json::to_string(&map).unwrap(), json);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let json = r#"{"z":1,"a":2,"m":3}"#;
        let map: AttributeMap = serde_json::from_str(json).unwrap();

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn empty_list_is_absent() {
        assert!(AttributeValue::List(vec![]).is_empty_list());
        assert!(!AttributeValue::List(vec![AttributeValue::Bool(true)]).is_empty_list());
        assert!(!AttributeValue::Null.is_present());
        assert!(AttributeValue::from("x").is_present());
    }
}
