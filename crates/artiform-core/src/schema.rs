//! Declared resource schemas and validation
//!
//! A [`Schema`] maps field names to [`FieldSchema`] descriptors. Schemas are
//! composed once at registration time (see [`merge_schema`](crate::merge_schema))
//! and are immutable afterwards.
//!
//! Validation goes through JSON Schema: a schema is exported with
//! [`Schema::to_json_schema`], compiled once by [`SchemaValidator`], and
//! configuration data is checked against it before any remote call.

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

use crate::data::ResourceData;
use crate::error::{CoreError, Result, ValidationErrorInfo};
use crate::value::FieldValue;

/// Value type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    String,
    Bool,
    Int,
    StringSet,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::StringSet => "set of string",
        };
        f.write_str(name)
    }
}

/// Value constraint attached to a field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "arg", rename_all = "snake_case")]
pub enum Validator {
    /// Value must match the regular expression
    Pattern(String),
    /// Value must be an absolute http(s) URL
    HttpUrl,
    /// Value must be one of the listed tokens
    OneOf(Vec<String>),
    /// Integer must be at least this value
    AtLeast(i64),
}

impl Validator {
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::OneOf(values.into_iter().map(Into::into).collect())
    }

    fn apply(&self, prop: &mut serde_json::Map<String, JsonValue>) {
        match self {
            Validator::Pattern(pattern) => {
                prop.insert("pattern".into(), JsonValue::String(pattern.clone()));
            }
            Validator::HttpUrl => {
                prop.insert(
                    "pattern".into(),
                    JsonValue::String(r"^https?://[^\s/$.?#][^\s]*$".into()),
                );
            }
            Validator::OneOf(values) => {
                prop.insert(
                    "enum".into(),
                    JsonValue::Array(values.iter().cloned().map(JsonValue::String).collect()),
                );
            }
            Validator::AtLeast(min) => {
                prop.insert("minimum".into(), JsonValue::from(*min));
            }
        }
    }
}

/// Descriptor for a single field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: FieldType,

    pub required: bool,

    pub optional: bool,

    /// Value may be filled in by the server when not configured
    pub computed: bool,

    /// Changing the value requires replacing the resource
    pub force_new: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<Validator>,

    /// Alias -> canonical value rewrites the server applies on write
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub canonical: BTreeMap<String, String>,
}

impl FieldSchema {
    fn of(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            optional: false,
            computed: false,
            force_new: false,
            description: None,
            validator: None,
            canonical: BTreeMap::new(),
        }
    }

    pub fn string() -> Self {
        Self::of(FieldType::String)
    }

    pub fn bool() -> Self {
        Self::of(FieldType::Bool)
    }

    pub fn int() -> Self {
        Self::of(FieldType::Int)
    }

    pub fn string_set() -> Self {
        Self::of(FieldType::StringSet)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.optional = false;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self.required = false;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Computed, and neither optional nor required: only the server sets it
    pub fn is_read_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }

    pub fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Declare that the server reports `alias` back as `canonical`
    pub fn canonical_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.canonical.insert(alias.into(), canonical.into());
        self
    }

    /// Rewrite a value to the form the server reports back
    pub fn canonicalize(&self, value: FieldValue) -> FieldValue {
        match value {
            FieldValue::String(s) => match self.canonical.get(&s) {
                Some(canonical) => FieldValue::String(canonical.clone()),
                None => FieldValue::String(s),
            },
            other => other,
        }
    }

    /// Zero value of this field's type
    pub fn zero_value(&self) -> FieldValue {
        match self.field_type {
            FieldType::String => FieldValue::String(String::new()),
            FieldType::Bool => FieldValue::Bool(false),
            FieldType::Int => FieldValue::Int(0),
            FieldType::StringSet => FieldValue::Set(Default::default()),
        }
    }

    fn to_json_schema(&self) -> JsonValue {
        let mut prop = serde_json::Map::new();

        match self.field_type {
            FieldType::String => {
                prop.insert("type".into(), JsonValue::String("string".into()));
            }
            FieldType::Bool => {
                prop.insert("type".into(), JsonValue::String("boolean".into()));
            }
            FieldType::Int => {
                prop.insert("type".into(), JsonValue::String("integer".into()));
            }
            FieldType::StringSet => {
                prop.insert("type".into(), JsonValue::String("array".into()));
                prop.insert("items".into(), serde_json::json!({ "type": "string" }));
            }
        }

        if let Some(desc) = &self.description {
            prop.insert("description".into(), JsonValue::String(desc.clone()));
        }
        if self.is_read_only() {
            prop.insert("readOnly".into(), JsonValue::Bool(true));
        }
        if let Some(validator) = &self.validator {
            validator.apply(&mut prop);
        }

        JsonValue::Object(prop)
    }
}

/// Field name -> descriptor mapping for one resource type
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Schema {
    fields: BTreeMap<String, FieldSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field
    pub fn field(mut self, name: impl Into<String>, schema: FieldSchema) -> Self {
        self.fields.insert(name.into(), schema);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSchema)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub(crate) fn insert(&mut self, name: String, schema: FieldSchema) {
        self.fields.insert(name, schema);
    }

    /// Names of all required fields
    pub fn required_fields(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, f)| f.required)
            .map(|(name, _)| name)
            .collect()
    }

    /// Export as a draft-07 JSON Schema object
    pub fn to_json_schema(&self) -> JsonValue {
        let properties: serde_json::Map<String, JsonValue> = self
            .fields
            .iter()
            .map(|(name, field)| (name.clone(), field.to_json_schema()))
            .collect();

        let required: Vec<JsonValue> = self
            .required_fields()
            .into_iter()
            .map(|name| JsonValue::String(name.to_string()))
            .collect();

        let mut schema = serde_json::Map::new();
        schema.insert(
            "$schema".into(),
            JsonValue::String("http://json-schema.org/draft-07/schema#".into()),
        );
        schema.insert("type".into(), JsonValue::String("object".into()));
        schema.insert("properties".into(), JsonValue::Object(properties));
        if !required.is_empty() {
            schema.insert("required".into(), JsonValue::Array(required));
        }
        schema.insert("additionalProperties".into(), JsonValue::Bool(false));

        JsonValue::Object(schema)
    }
}

/// Result of schema validation
#[derive(Debug)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationErrorInfo>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: vec![],
        }
    }

    pub fn failure(errors: Vec<ValidationErrorInfo>) -> Self {
        Self {
            is_valid: false,
            errors,
        }
    }

    /// Convert into a `Result`, failing with [`CoreError::Validation`]
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(CoreError::Validation {
                errors: self.errors,
            })
        }
    }
}

/// Validator with the compiled JSON Schema cached
pub struct SchemaValidator {
    compiled: jsonschema::Validator,
}

impl SchemaValidator {
    pub fn new(schema: &Schema) -> Result<Self> {
        let json_schema = schema.to_json_schema();
        let compiled =
            jsonschema::validator_for(&json_schema).map_err(|e| CoreError::InvalidSchema {
                message: format!("Invalid schema: {}", e),
            })?;

        Ok(Self { compiled })
    }

    /// Validate a raw JSON document (one resource's configuration)
    pub fn validate(&self, values: &JsonValue) -> ValidationResult {
        if self.compiled.is_valid(values) {
            return ValidationResult::success();
        }

        let errors: Vec<ValidationErrorInfo> = self
            .compiled
            .iter_errors(values)
            .map(|e| {
                let path = e.instance_path.to_string();
                ValidationErrorInfo {
                    path: if path.is_empty() {
                        "(root)".to_string()
                    } else {
                        path.trim_start_matches('/').to_string()
                    },
                    message: format_validation_error(&e),
                    expected: None,
                    actual: None,
                }
            })
            .collect();

        ValidationResult::failure(errors)
    }

    /// Validate configuration data
    ///
    /// Zero values of optional fields count as unset, so state written back
    /// by a read (which stores `""` for absent strings) validates like the
    /// configuration it came from.
    pub fn validate_data(&self, data: &ResourceData) -> ValidationResult {
        let schema = data.schema();
        let values: serde_json::Map<String, JsonValue> = data
            .values()
            .iter()
            .filter(|(name, value)| {
                let required = schema.get(name).is_some_and(|f| f.required);
                required || !value.is_zero()
            })
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        self.validate(&JsonValue::Object(values))
    }
}

fn format_validation_error(error: &jsonschema::ValidationError) -> String {
    error.to_string().replace('"', "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Schema {
        Schema::new()
            .field(
                "key",
                FieldSchema::string()
                    .required()
                    .force_new()
                    .validate(Validator::Pattern("^[a-z][a-z0-9-]*$".into())),
            )
            .field(
                "url",
                FieldSchema::string().required().validate(Validator::HttpUrl),
            )
            .field("offline", FieldSchema::bool().optional())
            .field(
                "socket_timeout_millis",
                FieldSchema::int().optional().validate(Validator::AtLeast(0)),
            )
            .field("property_sets", FieldSchema::string_set().optional())
            .field(
                "package_type",
                FieldSchema::string()
                    .optional()
                    .computed()
                    .validate(Validator::one_of(["rpm", "yum", "generic"]))
                    .canonical_alias("yum", "rpm"),
            )
    }

    #[test]
    fn test_json_schema_export() {
        let json = sample().to_json_schema();
        let obj = json.as_object().unwrap();

        assert_eq!(obj.get("type"), Some(&JsonValue::String("object".into())));
        assert_eq!(obj.get("additionalProperties"), Some(&JsonValue::Bool(false)));

        let required = obj.get("required").unwrap().as_array().unwrap();
        assert_eq!(required.len(), 2);
        assert!(required.contains(&JsonValue::String("key".into())));

        let sets = &obj["properties"]["property_sets"];
        assert_eq!(sets["type"], "array");
        assert_eq!(sets["items"]["type"], "string");
    }

    #[test]
    fn test_validation_success() {
        let validator = SchemaValidator::new(&sample()).unwrap();
        let result = validator.validate(&serde_json::json!({
            "key": "my-repo",
            "url": "https://example.com/repo",
            "offline": false,
            "property_sets": ["a", "b"],
            "package_type": "yum"
        }));
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_validation_failures() {
        let validator = SchemaValidator::new(&sample()).unwrap();
        let result = validator.validate(&serde_json::json!({
            "key": "1-bad key",
            "url": "ftp://example.com",
            "socket_timeout_millis": -5,
            "package_type": "bogus",
            "unexpected": true
        }));

        assert!(!result.is_valid);
        let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"key"));
        assert!(paths.contains(&"url"));
        assert!(paths.contains(&"socket_timeout_millis"));
        assert!(paths.contains(&"package_type"));
        // unknown property is reported on the root object
        assert!(paths.contains(&"(root)"));
    }

    #[test]
    fn test_missing_required() {
        let validator = SchemaValidator::new(&sample()).unwrap();
        let result = validator.validate(&serde_json::json!({ "key": "ok" }));
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e.message.contains("url")));
        assert!(result.into_result().is_err());
    }

    #[test]
    fn test_validate_data_skips_optional_zero_values() {
        let schema = std::sync::Arc::new(sample());
        let validator = SchemaValidator::new(&schema).unwrap();

        // a read writes "" for absent strings; enum validators must not trip on it
        let data = ResourceData::from_json(
            schema.clone(),
            &serde_json::json!({
                "key": "my-repo",
                "url": "https://example.com/repo",
                "package_type": ""
            }),
        )
        .unwrap();
        assert!(validator.validate_data(&data).is_valid);

        // required fields are checked even when empty
        let data = ResourceData::from_json(
            schema,
            &serde_json::json!({ "key": "", "url": "https://example.com/repo" }),
        )
        .unwrap();
        assert!(!validator.validate_data(&data).is_valid);
    }

    #[test]
    fn test_canonicalize() {
        let schema = sample();
        let field = schema.get("package_type").unwrap();
        assert_eq!(
            field.canonicalize(FieldValue::String("yum".into())),
            FieldValue::String("rpm".into())
        );
        assert_eq!(
            field.canonicalize(FieldValue::String("generic".into())),
            FieldValue::String("generic".into())
        );
    }

    #[test]
    fn test_computed_only_fields_are_read_only() {
        assert!(FieldSchema::string().computed().is_read_only());
        assert!(!FieldSchema::string().optional().computed().is_read_only());
        assert!(!FieldSchema::string().required().computed().is_read_only());

        let schema = sample().field("rclass", FieldSchema::string().computed());
        let json = schema.to_json_schema();
        assert_eq!(json["properties"]["rclass"]["readOnly"], true);
        assert!(json["properties"]["package_type"].get("readOnly").is_none());
    }

    #[test]
    fn test_required_overrides_optional() {
        let field = FieldSchema::string().optional().required();
        assert!(field.required);
        assert!(!field.optional);
    }
}
