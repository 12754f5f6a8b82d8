//! Core error types

use std::fmt;

use thiserror::Error;

use crate::schema::FieldType;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Unknown field: {field} is not declared in the schema")]
    UnknownField { field: String },

    #[error("Field {field} is computed by the server and cannot be configured")]
    ReadOnlyField { field: String },

    #[error("Type mismatch for field {field}: expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        actual: FieldType,
    },

    #[error("Failed saving state for {resource}: {}", format_write_errors(.errors))]
    StateWrite {
        resource: String,
        errors: Vec<FieldWriteError>,
    },

    #[error("Validation failed:\n{}", format_validation_errors(.errors))]
    Validation { errors: Vec<ValidationErrorInfo> },

    #[error("Invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;

/// A single failed write recorded by a [`StateWriter`](crate::StateWriter)
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWriteError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for FieldWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A validation failure located at a field path
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrorInfo {
    pub path: String,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl fmt::Display for ValidationErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(expected) = &self.expected {
            write!(f, " (expected {})", expected)?;
        }
        Ok(())
    }
}

fn format_write_errors(errors: &[FieldWriteError]) -> String {
    errors
        .iter()
        .map(|e| format!("{:?}", e.to_string()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_validation_errors(errors: &[ValidationErrorInfo]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}
