//! Typed field values held in configuration data

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

use crate::schema::FieldType;

/// A single configuration value
///
/// Sets are kept as a `BTreeSet` so that two sets with the same members
/// always compare and serialize identically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    String(String),
    Set(BTreeSet<String>),
}

impl FieldValue {
    /// The schema type this value satisfies
    pub fn field_type(&self) -> FieldType {
        match self {
            FieldValue::Bool(_) => FieldType::Bool,
            FieldValue::Int(_) => FieldType::Int,
            FieldValue::String(_) => FieldType::String,
            FieldValue::Set(_) => FieldType::StringSet,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            FieldValue::Set(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is the zero value of its type
    pub fn is_zero(&self) -> bool {
        match self {
            FieldValue::Bool(b) => !b,
            FieldValue::Int(i) => *i == 0,
            FieldValue::String(s) => s.is_empty(),
            FieldValue::Set(s) => s.is_empty(),
        }
    }

    /// Convert a JSON value into a field value of the requested type
    ///
    /// Returns `None` when the JSON shape does not fit the type. Arrays are
    /// accepted for sets as long as every element is a string.
    pub fn from_json(value: &JsonValue, field_type: FieldType) -> Option<Self> {
        match (field_type, value) {
            (FieldType::String, JsonValue::String(s)) => Some(FieldValue::String(s.clone())),
            (FieldType::Bool, JsonValue::Bool(b)) => Some(FieldValue::Bool(*b)),
            (FieldType::Int, JsonValue::Number(n)) => n.as_i64().map(FieldValue::Int),
            (FieldType::StringSet, JsonValue::Array(items)) => items
                .iter()
                .map(|item| item.as_str().map(String::from))
                .collect::<Option<BTreeSet<_>>>()
                .map(FieldValue::Set),
            _ => None,
        }
    }

    pub fn to_json(&self) -> JsonValue {
        match self {
            FieldValue::Bool(b) => JsonValue::Bool(*b),
            FieldValue::Int(i) => JsonValue::from(*i),
            FieldValue::String(s) => JsonValue::String(s.clone()),
            FieldValue::Set(s) => {
                JsonValue::Array(s.iter().cloned().map(JsonValue::String).collect())
            }
        }
    }
}

/// Conversion used by the state writer
///
/// `None` means "unset": the field is removed from the configuration data
/// instead of being written as a zero value.
pub trait IntoFieldValue {
    fn into_field_value(self) -> Option<FieldValue>;
}

impl IntoFieldValue for FieldValue {
    fn into_field_value(self) -> Option<FieldValue> {
        Some(self)
    }
}

impl IntoFieldValue for String {
    fn into_field_value(self) -> Option<FieldValue> {
        Some(FieldValue::String(self))
    }
}

impl IntoFieldValue for &str {
    fn into_field_value(self) -> Option<FieldValue> {
        Some(FieldValue::String(self.to_string()))
    }
}

impl IntoFieldValue for &String {
    fn into_field_value(self) -> Option<FieldValue> {
        Some(FieldValue::String(self.clone()))
    }
}

impl IntoFieldValue for bool {
    fn into_field_value(self) -> Option<FieldValue> {
        Some(FieldValue::Bool(self))
    }
}

impl IntoFieldValue for Option<bool> {
    fn into_field_value(self) -> Option<FieldValue> {
        self.map(FieldValue::Bool)
    }
}

impl IntoFieldValue for i64 {
    fn into_field_value(self) -> Option<FieldValue> {
        Some(FieldValue::Int(self))
    }
}

impl IntoFieldValue for &[String] {
    fn into_field_value(self) -> Option<FieldValue> {
        Some(FieldValue::Set(self.iter().cloned().collect()))
    }
}

impl IntoFieldValue for &Vec<String> {
    fn into_field_value(self) -> Option<FieldValue> {
        self.as_slice().into_field_value()
    }
}

impl IntoFieldValue for BTreeSet<String> {
    fn into_field_value(self) -> Option<FieldValue> {
        Some(FieldValue::Set(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_matches_type() {
        let v = FieldValue::from_json(&serde_json::json!(["b", "a", "b"]), FieldType::StringSet);
        let set = v.unwrap();
        assert_eq!(
            set.as_set().unwrap().iter().collect::<Vec<_>>(),
            vec!["a", "b"]
        );

        assert!(FieldValue::from_json(&serde_json::json!("x"), FieldType::Bool).is_none());
        assert!(FieldValue::from_json(&serde_json::json!([1, 2]), FieldType::StringSet).is_none());
        assert_eq!(
            FieldValue::from_json(&serde_json::json!(42), FieldType::Int),
            Some(FieldValue::Int(42))
        );
    }

    #[test]
    fn test_unset_tristate() {
        assert_eq!(None::<bool>.into_field_value(), None);
        assert_eq!(
            Some(false).into_field_value(),
            Some(FieldValue::Bool(false))
        );
    }

    #[test]
    fn test_is_zero() {
        assert!(FieldValue::String(String::new()).is_zero());
        assert!(FieldValue::Int(0).is_zero());
        assert!(!FieldValue::Bool(true).is_zero());
    }
}
