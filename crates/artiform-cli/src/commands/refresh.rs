//! Refresh command - read every managed repository back into the state

use artiform_repo::{RepositoryService, ResourceRegistry};
use console::style;
use std::path::Path;

use crate::error::Result;
use crate::state::State;

/// Read each state entry from the server; returns the addresses that vanished
pub async fn refresh_state(
    registry: &ResourceRegistry,
    service: &dyn RepositoryService,
    state: &mut State,
) -> Result<Vec<String>> {
    let mut vanished = Vec::new();
    let addresses: Vec<String> = state.resources.keys().cloned().collect();

    for address in addresses {
        let Some(entry) = state.resources.get(&address).cloned() else {
            continue;
        };
        let resource = registry.get(&entry.resource_type)?;
        let mut data = entry.to_data(resource.as_ref())?;

        resource.read(service, &mut data).await?;
        if data.id().is_none() {
            vanished.push(address.clone());
        }
        state.record(&address, &entry.resource_type, &data);
    }

    Ok(vanished)
}

pub async fn run(state_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let registry = ResourceRegistry::builtin()?;
    let mut state = State::load(state_path)?;

    if state.resources.is_empty() {
        println!("{} No resources in {}", style("→").blue(), state_path.display());
        return Ok(());
    }

    let service = super::connect(config_path)?;
    let vanished = refresh_state(&registry, &service, &mut state).await?;
    state.save(state_path)?;

    for address in &vanished {
        println!(
            "  {} {} no longer exists, removed from state",
            style("⚠").yellow(),
            address
        );
    }
    println!(
        "{} Refreshed {}",
        style("✓").green().bold(),
        crate::display::pluralize(state.resources.len(), "resource", "resources")
    );
    Ok(())
}
