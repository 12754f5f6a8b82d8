//! Drift detection between desired configuration and persisted state
//!
//! Comparison rules, per declared field:
//! - an unset computed field in the desired data never drifts (the server owns it)
//! - an unset field compares equal to its zero value
//! - desired values are canonicalized first, so a configured alias that the
//!   server reports back under its canonical name is not a change

use serde::Serialize;

use crate::data::ResourceData;
use crate::schema::Schema;
use crate::value::FieldValue;

/// One field that differs between state and configuration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDiff {
    pub field: String,
    pub old: Option<FieldValue>,
    pub new: Option<FieldValue>,
    pub force_new: bool,
}

/// What the host has to do to converge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    NoOp,
    Create,
    Update,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan {
    pub action: PlanAction,
    pub changes: Vec<FieldDiff>,
}

impl Plan {
    pub fn is_empty(&self) -> bool {
        self.action == PlanAction::NoOp
    }
}

/// Field-level differences between `prior` state and `desired` configuration
pub fn diff(schema: &Schema, prior: &ResourceData, desired: &ResourceData) -> Vec<FieldDiff> {
    let mut changes = Vec::new();

    for (name, field) in schema.iter() {
        let old = prior.get(name);
        let new = desired.get(name).map(|v| field.canonicalize(v.clone()));

        if new.is_none() && field.computed {
            continue;
        }

        let zero = field.zero_value();
        let old_cmp = old.unwrap_or(&zero);
        let new_cmp = new.as_ref().unwrap_or(&zero);
        if old_cmp == new_cmp {
            continue;
        }

        changes.push(FieldDiff {
            field: name.to_string(),
            old: old.cloned(),
            new,
            force_new: field.force_new,
        });
    }

    changes
}

/// Plan the transition from `prior` to `desired`
///
/// A prior state without an id means the resource is absent.
pub fn plan(schema: &Schema, prior: Option<&ResourceData>, desired: &ResourceData) -> Plan {
    let Some(prior) = prior.filter(|p| p.id().is_some()) else {
        let changes = desired
            .values()
            .iter()
            .map(|(name, value)| FieldDiff {
                field: name.clone(),
                old: None,
                new: Some(
                    schema
                        .get(name)
                        .map(|f| f.canonicalize(value.clone()))
                        .unwrap_or_else(|| value.clone()),
                ),
                force_new: false,
            })
            .collect();
        return Plan {
            action: PlanAction::Create,
            changes,
        };
    };

    let changes = diff(schema, prior, desired);
    let action = if changes.is_empty() {
        PlanAction::NoOp
    } else if changes.iter().any(|c| c.force_new) {
        PlanAction::Replace
    } else {
        PlanAction::Update
    };

    Plan { action, changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSchema;
    use std::sync::Arc;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new()
                .field("key", FieldSchema::string().required().force_new())
                .field("notes", FieldSchema::string().optional())
                .field("xray_index", FieldSchema::bool().optional().computed())
                .field(
                    "package_type",
                    FieldSchema::string()
                        .optional()
                        .computed()
                        .force_new()
                        .canonical_alias("yum", "rpm"),
                ),
        )
    }

    fn data(json: serde_json::Value) -> ResourceData {
        ResourceData::from_json(schema(), &json).unwrap()
    }

    fn state(json: serde_json::Value) -> ResourceData {
        let mut d = data(json);
        d.set_id("libs");
        d
    }

    #[test]
    fn test_alias_is_not_drift() {
        let prior = state(serde_json::json!({ "key": "libs", "package_type": "rpm" }));
        let desired = data(serde_json::json!({ "key": "libs", "package_type": "yum" }));
        assert!(diff(&schema(), &prior, &desired).is_empty());
    }

    #[test]
    fn test_unset_computed_is_not_drift() {
        let prior = state(serde_json::json!({ "key": "libs", "xray_index": true }));
        let desired = data(serde_json::json!({ "key": "libs" }));
        assert!(plan(&schema(), Some(&prior), &desired).is_empty());
    }

    #[test]
    fn test_unset_equals_zero() {
        let prior = state(serde_json::json!({ "key": "libs", "notes": "" }));
        let desired = data(serde_json::json!({ "key": "libs" }));
        assert!(diff(&schema(), &prior, &desired).is_empty());
    }

    #[test]
    fn test_update_and_replace() {
        let prior = state(serde_json::json!({ "key": "libs", "notes": "a" }));

        let desired = data(serde_json::json!({ "key": "libs", "notes": "b" }));
        let p = plan(&schema(), Some(&prior), &desired);
        assert_eq!(p.action, PlanAction::Update);
        assert_eq!(p.changes.len(), 1);
        assert_eq!(p.changes[0].field, "notes");

        let desired = data(serde_json::json!({ "key": "libs2", "notes": "a" }));
        assert_eq!(
            plan(&schema(), Some(&prior), &desired).action,
            PlanAction::Replace
        );
    }

    #[test]
    fn test_absent_prior_plans_create() {
        let desired = data(serde_json::json!({ "key": "libs", "package_type": "yum" }));
        let p = plan(&schema(), None, &desired);
        assert_eq!(p.action, PlanAction::Create);
        let pt = p.changes.iter().find(|c| c.field == "package_type").unwrap();
        assert_eq!(pt.new, Some(FieldValue::String("rpm".into())));

        // state whose id was cleared by a read is absent too
        let gone = data(serde_json::json!({ "key": "libs" }));
        assert_eq!(plan(&schema(), Some(&gone), &desired).action, PlanAction::Create);
    }
}
