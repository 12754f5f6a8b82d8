//! Typed field access over [`ResourceData`]
//!
//! Getters normalize optional values: an unset field reads as the zero value
//! of its type unless the caller passes `allow_empty = false`, in which case
//! an unset field is a [`CoreError::MissingField`]. Reading a field that is
//! not declared, or with the wrong type, is always an error since it means
//! the unpack function and the schema disagree.
//!
//! Writes go through a [`StateWriter`], which attempts every write and
//! collects the failures so one pack pass reports all broken fields at once.

use std::sync::Arc;

use crate::data::ResourceData;
use crate::error::{CoreError, FieldWriteError, Result};
use crate::schema::FieldType;
use crate::value::{FieldValue, IntoFieldValue};

impl ResourceData {
    fn lookup(&self, key: &str, expected: FieldType, allow_empty: bool) -> Result<Option<&FieldValue>> {
        let field = self.schema().get(key).ok_or_else(|| CoreError::UnknownField {
            field: key.to_string(),
        })?;
        if field.field_type != expected {
            return Err(CoreError::TypeMismatch {
                field: key.to_string(),
                expected,
                actual: field.field_type,
            });
        }

        match self.get(key) {
            Some(value) => Ok(Some(value)),
            None if allow_empty => Ok(None),
            None => Err(CoreError::MissingField {
                field: key.to_string(),
            }),
        }
    }

    pub fn get_string(&self, key: &str, allow_empty: bool) -> Result<String> {
        Ok(self
            .lookup(key, FieldType::String, allow_empty)?
            .and_then(FieldValue::as_str)
            .map(String::from)
            .unwrap_or_default())
    }

    pub fn get_bool(&self, key: &str, allow_empty: bool) -> Result<bool> {
        Ok(self.get_bool_ref(key, allow_empty)?.unwrap_or(false))
    }

    /// Three-state read: `None` when the field was never configured
    pub fn get_bool_ref(&self, key: &str, allow_empty: bool) -> Result<Option<bool>> {
        Ok(self
            .lookup(key, FieldType::Bool, allow_empty)?
            .and_then(FieldValue::as_bool))
    }

    pub fn get_int(&self, key: &str, allow_empty: bool) -> Result<i64> {
        Ok(self
            .lookup(key, FieldType::Int, allow_empty)?
            .and_then(FieldValue::as_int)
            .unwrap_or(0))
    }

    /// Members of a set field in sorted order; empty when unset
    pub fn get_set(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .lookup(key, FieldType::StringSet, true)?
            .and_then(FieldValue::as_set)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default())
    }

    /// Start a write pass over this data
    pub fn writer(&mut self) -> StateWriter<'_> {
        StateWriter::new(self)
    }
}

/// Accumulating field writer
///
/// ```
/// use std::sync::Arc;
/// use artiform_core::{FieldSchema, ResourceData, Schema};
///
/// let schema = Arc::new(Schema::new().field("key", FieldSchema::string().required()));
/// let mut data = ResourceData::new(schema);
///
/// let mut w = data.writer();
/// w.set("key", "libs-release");
/// w.set("missing", true);
/// let err = w.finish("local repository").unwrap_err();
/// assert!(err.to_string().contains("missing"));
/// assert_eq!(data.get_string("key", false).unwrap(), "libs-release");
/// ```
pub struct StateWriter<'a> {
    data: &'a mut ResourceData,
    errors: Vec<FieldWriteError>,
}

impl<'a> StateWriter<'a> {
    pub fn new(data: &'a mut ResourceData) -> Self {
        Self {
            data,
            errors: Vec::new(),
        }
    }

    /// Write one field, recording a failure instead of stopping
    pub fn set(&mut self, key: &str, value: impl IntoFieldValue) -> &mut Self {
        if let Err(message) = self.try_set(key, value.into_field_value()) {
            self.errors.push(FieldWriteError {
                field: key.to_string(),
                message,
            });
        }
        self
    }

    fn try_set(&mut self, key: &str, value: Option<FieldValue>) -> std::result::Result<(), String> {
        let schema = Arc::clone(self.data.schema());
        let field = schema
            .get(key)
            .ok_or_else(|| "field is not declared in the schema".to_string())?;

        let Some(value) = value else {
            self.data.remove(key);
            return Ok(());
        };

        if value.field_type() != field.field_type {
            return Err(format!(
                "expected {}, got {}",
                field.field_type,
                value.field_type()
            ));
        }

        let value = field.canonicalize(value);
        self.data.insert(key, value);
        Ok(())
    }

    /// Failures recorded so far
    pub fn errors(&self) -> &[FieldWriteError] {
        &self.errors
    }

    /// Finish the pass, aggregating every failure into one error
    pub fn finish(self, resource: &str) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::StateWrite {
                resource: resource.to_string(),
                errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSchema, Schema};

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new()
                .field("key", FieldSchema::string().required())
                .field("notes", FieldSchema::string().optional())
                .field("blacked_out", FieldSchema::bool().optional().computed())
                .field("max_unique_tags", FieldSchema::int().optional())
                .field("property_sets", FieldSchema::string_set().optional())
                .field(
                    "package_type",
                    FieldSchema::string()
                        .optional()
                        .canonical_alias("yum", "rpm"),
                ),
        )
    }

    #[test]
    fn test_absent_fields_with_allow_empty() {
        let data = ResourceData::new(schema());
        assert_eq!(data.get_string("notes", true).unwrap(), "");
        assert!(!data.get_bool("blacked_out", true).unwrap());
        assert_eq!(data.get_bool_ref("blacked_out", true).unwrap(), None);
        assert_eq!(data.get_int("max_unique_tags", true).unwrap(), 0);
        assert!(data.get_set("property_sets").unwrap().is_empty());
    }

    #[test]
    fn test_absent_fields_without_allow_empty() {
        let data = ResourceData::new(schema());
        assert!(matches!(
            data.get_string("key", false),
            Err(CoreError::MissingField { .. })
        ));
        assert!(data.get_bool_ref("blacked_out", false).is_err());
        assert!(data.get_int("max_unique_tags", false).is_err());
    }

    #[test]
    fn test_tristate_distinguishes_false_from_unset() {
        let mut data = ResourceData::new(schema());
        data.writer().set("blacked_out", false);
        assert_eq!(data.get_bool_ref("blacked_out", false).unwrap(), Some(false));

        data.writer().set("blacked_out", None::<bool>);
        assert_eq!(data.get_bool_ref("blacked_out", true).unwrap(), None);
    }

    #[test]
    fn test_undeclared_or_mistyped_reads_fail() {
        let data = ResourceData::new(schema());
        assert!(matches!(
            data.get_string("nope", true),
            Err(CoreError::UnknownField { .. })
        ));
        assert!(matches!(
            data.get_bool("notes", true),
            Err(CoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_writer_aggregates_errors() {
        let mut data = ResourceData::new(schema());
        let mut w = data.writer();
        w.set("key", "libs");
        w.set("unknown_a", "x");
        w.set("max_unique_tags", "not an int");
        w.set("notes", "kept");
        assert_eq!(w.errors().len(), 2);

        let err = w.finish("local repository").unwrap_err();
        match &err {
            CoreError::StateWrite { resource, errors } => {
                assert_eq!(resource, "local repository");
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["unknown_a", "max_unique_tags"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        // the good writes still landed
        assert_eq!(data.get_string("key", false).unwrap(), "libs");
        assert_eq!(data.get_string("notes", false).unwrap(), "kept");
    }

    #[test]
    fn test_writer_canonicalizes() {
        let mut data = ResourceData::new(schema());
        data.writer().set("package_type", "yum");
        assert_eq!(data.get_string("package_type", false).unwrap(), "rpm");
    }

    #[test]
    fn test_set_roundtrip_is_sorted() {
        let mut data = ResourceData::new(schema());
        let sets = vec!["zeta".to_string(), "alpha".to_string()];
        data.writer().set("property_sets", &sets);
        assert_eq!(data.get_set("property_sets").unwrap(), vec!["alpha", "zeta"]);
    }
}
