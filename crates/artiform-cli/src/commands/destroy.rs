//! Destroy command - delete managed repositories

use artiform_repo::ResourceRegistry;
use console::style;
use std::path::Path;

use crate::error::{CliError, Result};
use crate::state::State;

pub async fn run(state_path: &Path, config_path: Option<&Path>, targets: &[String]) -> Result<()> {
    let registry = ResourceRegistry::builtin()?;
    let mut state = State::load(state_path)?;

    for target in targets {
        if !state.resources.contains_key(target) {
            return Err(CliError::usage_with_help(
                format!("{} is not in the state", target),
                "run `artiform show` to list managed addresses",
            ));
        }
    }

    let addresses: Vec<String> = state
        .resources
        .keys()
        .filter(|a| targets.is_empty() || targets.contains(a))
        .cloned()
        .collect();

    if addresses.is_empty() {
        println!("{} Nothing to destroy", style("✓").green().bold());
        return Ok(());
    }

    let service = super::connect(config_path)?;
    for address in &addresses {
        let Some(saved) = state.resources.get(address).cloned() else {
            continue;
        };
        let resource = registry.get(&saved.resource_type)?;
        let data = saved.to_data(resource.as_ref())?;

        resource.delete(&service, &data).await?;
        state.resources.remove(address);
        state.save(state_path)?;
        println!("  {} {} destroyed", style("-").red(), address);
    }

    println!();
    println!(
        "{} Destroy complete! {} destroyed.",
        style("✓").green().bold(),
        crate::display::pluralize(addresses.len(), "resource", "resources")
    );
    Ok(())
}
