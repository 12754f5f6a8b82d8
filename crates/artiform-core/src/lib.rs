//! Artiform Core - configuration data and schemas for repository resources
//!
//! This crate provides the pieces every resource type is built from:
//! - `ResourceData`: one resource's field values, bound to its schema
//! - Field accessors: typed getters and the accumulating `StateWriter`
//! - `Schema`: field descriptors, JSON Schema export and validation
//! - `merge_schema`: composition of a base schema with type-specific fields
//! - Drift detection between desired configuration and persisted state

pub mod accessor;
pub mod data;
pub mod drift;
pub mod error;
pub mod merge;
pub mod schema;
pub mod value;

pub use accessor::StateWriter;
pub use data::ResourceData;
pub use drift::{FieldDiff, Plan, PlanAction, diff, plan};
pub use error::{CoreError, FieldWriteError, Result, ValidationErrorInfo};
pub use merge::{deep_merge, merge_schema};
pub use schema::{FieldSchema, FieldType, Schema, SchemaValidator, ValidationResult, Validator};
pub use value::{FieldValue, IntoFieldValue};
