//! Plan command - show what apply would change

use artiform_core::{FieldDiff, PlanAction, plan};
use artiform_repo::ResourceRegistry;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::Path;

use crate::display::{PlanSummary, display_plan, field_json};
use crate::error::Result;
use crate::exit_codes;
use crate::manifest::{Declared, Manifest};
use crate::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    Create,
    Update,
    Replace,
    Delete,
}

/// One pending change to a resource address
#[derive(Debug, Clone)]
pub struct Step {
    pub address: String,
    pub resource_type: String,
    pub action: StepAction,
    pub changes: Vec<FieldDiff>,
}

impl Step {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "address": self.address,
            "type": self.resource_type,
            "action": self.action,
            "changes": self.changes.iter().map(|c| {
                serde_json::json!({
                    "field": c.field,
                    "old": field_json(&c.field, c.old.as_ref()),
                    "new": field_json(&c.field, c.new.as_ref()),
                    "forces_replacement": c.force_new,
                })
            }).collect::<Vec<_>>(),
        })
    }
}

/// Steps converging `state` to `declared`, in manifest order, deletions last
pub fn compute(declared: &[Declared], state: &State) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut wanted = BTreeSet::new();

    for entry in declared {
        wanted.insert(entry.address.as_str());

        let prior = match state.resources.get(&entry.address) {
            Some(saved) => Some(saved.to_data(entry.resource.as_ref())?),
            None => None,
        };
        let p = plan(entry.resource.schema(), prior.as_ref(), &entry.data);

        let action = match p.action {
            PlanAction::NoOp => continue,
            PlanAction::Create => StepAction::Create,
            PlanAction::Update => StepAction::Update,
            PlanAction::Replace => StepAction::Replace,
        };
        steps.push(Step {
            address: entry.address.clone(),
            resource_type: entry.resource.name().to_string(),
            action,
            changes: p.changes,
        });
    }

    for (address, saved) in &state.resources {
        if wanted.contains(address.as_str()) {
            continue;
        }
        steps.push(Step {
            address: address.clone(),
            resource_type: saved.resource_type.clone(),
            action: StepAction::Delete,
            changes: Vec::new(),
        });
    }

    Ok(steps)
}

pub async fn run(
    manifest_path: &Path,
    state_path: &Path,
    config_path: Option<&Path>,
    refresh: bool,
    json_output: bool,
    detailed_exitcode: bool,
) -> Result<()> {
    let registry = ResourceRegistry::builtin()?;
    let declared = Manifest::load(manifest_path)?.resolve(&registry)?;
    let mut state = State::load(state_path)?;

    if refresh && !state.resources.is_empty() {
        let service = super::connect(config_path)?;
        super::refresh::refresh_state(&registry, &service, &mut state).await?;
    }

    let steps = compute(&declared, &state)?;

    if json_output {
        let s = PlanSummary::from_steps(&steps);
        let output = serde_json::json!({
            "steps": steps.iter().map(Step::to_json).collect::<Vec<_>>(),
            "summary": { "add": s.add, "change": s.change, "destroy": s.destroy },
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        display_plan(&steps);
    }

    if detailed_exitcode && !steps.is_empty() {
        std::process::exit(exit_codes::CHANGES_PENDING);
    }
    Ok(())
}
