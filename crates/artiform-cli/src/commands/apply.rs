//! Apply command - converge the server to the manifest
//!
//! Every declared resource is validated before the first remote call.

use artiform_repo::{RepoError, RepositoryService, ResourceRegistry};
use console::style;
use std::collections::HashMap;
use std::path::Path;

use super::plan::{Step, StepAction, compute};
use crate::display::{PlanSummary, display_plan};
use crate::error::{CliError, Result};
use crate::manifest::{Declared, Manifest};
use crate::state::State;

pub async fn run(manifest_path: &Path, state_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let registry = ResourceRegistry::builtin()?;
    let declared = Manifest::load(manifest_path)?.resolve(&registry)?;
    validate_all(&declared)?;

    let service = super::connect(config_path)?;
    let mut state = State::load(state_path)?;

    if !state.resources.is_empty() {
        println!("{} Refreshing state...", style("→").blue());
        super::refresh::refresh_state(&registry, &service, &mut state).await?;
        state.save(state_path)?;
    }

    let steps = compute(&declared, &state)?;
    display_plan(&steps);
    if steps.is_empty() {
        return Ok(());
    }
    println!();

    let by_address: HashMap<&str, &Declared> =
        declared.iter().map(|d| (d.address.as_str(), d)).collect();

    for step in &steps {
        execute(&registry, &service, &by_address, &mut state, step).await?;
        state.save(state_path)?;
    }

    let s = PlanSummary::from_steps(&steps);
    println!();
    println!(
        "{} Apply complete! Resources: {} added, {} changed, {} destroyed.",
        style("✓").green().bold(),
        s.add,
        s.change,
        s.destroy
    );
    Ok(())
}

fn validate_all(declared: &[Declared]) -> Result<()> {
    let failures: Vec<String> = declared
        .iter()
        .filter_map(|d| match d.resource.validate(&d.data) {
            Ok(()) => None,
            Err(RepoError::Validation { errors, .. }) => Some(
                errors
                    .iter()
                    .map(|e| format!("{}: {}", d.address, e))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Err(other) => Some(format!("{}: {}", d.address, other)),
        })
        .collect();

    if failures.is_empty() {
        Ok(())
    } else {
        Err(CliError::Validation {
            message: format!("\n{}", failures.join("\n")),
            help: Some("nothing was changed; run `artiform validate` for details".to_string()),
        })
    }
}

async fn execute(
    registry: &ResourceRegistry,
    service: &dyn RepositoryService,
    declared: &HashMap<&str, &Declared>,
    state: &mut State,
    step: &Step,
) -> Result<()> {
    let address = step.address.as_str();

    if matches!(step.action, StepAction::Replace | StepAction::Delete) {
        if let Some(saved) = state.resources.get(address).cloned() {
            let resource = registry.get(&saved.resource_type)?;
            let data = saved.to_data(resource.as_ref())?;
            resource.delete(service, &data).await?;
            state.resources.remove(address);
            println!("  {} {} destroyed", style("-").red(), address);
        }
        if step.action == StepAction::Delete {
            return Ok(());
        }
    }

    let entry = declared
        .get(address)
        .ok_or_else(|| CliError::internal(format!("no declaration for {}", address)))?;
    let mut data = entry.data.clone();

    if step.action == StepAction::Update {
        let id = state
            .resources
            .get(address)
            .map(|saved| saved.id.clone())
            .ok_or_else(|| CliError::internal(format!("no state for {}", address)))?;
        data.set_id(id);
        entry.resource.update(service, &mut data).await?;
        println!("  {} {} updated", style("~").yellow(), address);
    } else {
        entry.resource.create(service, &mut data).await?;
        println!("  {} {} created", style("+").green(), address);
    }

    state.record(address, entry.resource.name(), &data);
    Ok(())
}
