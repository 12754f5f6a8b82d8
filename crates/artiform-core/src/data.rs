//! Configuration data for one resource instance

use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{CoreError, Result};
use crate::schema::Schema;
use crate::value::FieldValue;

/// Field values of a single resource, bound to the schema that declares them
///
/// The identifier is kept apart from the field values: an empty id means the
/// resource is absent and the host should (re)create it.
#[derive(Debug, Clone)]
pub struct ResourceData {
    schema: Arc<Schema>,
    id: Option<String>,
    values: BTreeMap<String, FieldValue>,
}

impl ResourceData {
    /// Create empty data for a schema
    pub fn new(schema: Arc<Schema>) -> Self {
        Self {
            schema,
            id: None,
            values: BTreeMap::new(),
        }
    }

    /// Build data from a JSON object, checking names and types against the schema
    ///
    /// `null` members are treated as unset.
    pub fn from_json(schema: Arc<Schema>, json: &JsonValue) -> Result<Self> {
        let obj = json.as_object().ok_or_else(|| CoreError::InvalidSchema {
            message: "configuration must be an object".to_string(),
        })?;

        let mut data = Self::new(schema);
        for (name, raw) in obj {
            if raw.is_null() {
                continue;
            }
            let field = data
                .schema
                .get(name)
                .ok_or_else(|| CoreError::UnknownField {
                    field: name.clone(),
                })?;
            let value = FieldValue::from_json(raw, field.field_type).ok_or_else(|| {
                CoreError::TypeMismatch {
                    field: name.clone(),
                    expected: field.field_type,
                    actual: json_type(raw),
                }
            })?;
            data.values.insert(name.clone(), value);
        }
        Ok(data)
    }

    /// Build data from user configuration
    ///
    /// Like [`from_json`](Self::from_json), but read-only fields are
    /// rejected: the server owns them and any configured value would drift.
    pub fn from_config(schema: Arc<Schema>, json: &JsonValue) -> Result<Self> {
        if let Some(obj) = json.as_object() {
            let read_only = obj
                .iter()
                .filter(|(_, raw)| !raw.is_null())
                .find(|(name, _)| schema.get(name).is_some_and(|f| f.is_read_only()));
            if let Some((name, _)) = read_only {
                return Err(CoreError::ReadOnlyField {
                    field: name.clone(),
                });
            }
        }
        Self::from_json(schema, json)
    }

    /// Parse a YAML document into configuration data
    pub fn from_yaml(schema: Arc<Schema>, yaml: &str) -> Result<Self> {
        let json: JsonValue = serde_yaml::from_str(yaml)?;
        Self::from_config(schema, &json)
    }

    /// JSON object holding every set field
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.values
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource as absent
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Raw value of a field, if set
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    pub(crate) fn insert(&mut self, name: &str, value: FieldValue) {
        self.values.insert(name.to_string(), value);
    }

    pub(crate) fn remove(&mut self, name: &str) {
        self.values.remove(name);
    }
}

impl PartialEq for ResourceData {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.values == other.values
    }
}

fn json_type(value: &JsonValue) -> crate::schema::FieldType {
    use crate::schema::FieldType;
    match value {
        JsonValue::Bool(_) => FieldType::Bool,
        JsonValue::Number(_) => FieldType::Int,
        JsonValue::Array(_) => FieldType::StringSet,
        _ => FieldType::String,
    }
}
