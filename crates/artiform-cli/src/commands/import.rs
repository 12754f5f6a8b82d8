//! Import command - adopt an existing repository into the state

use artiform_repo::ResourceRegistry;
use console::style;
use std::path::Path;

use crate::error::{CliError, Result};
use crate::manifest::parse_address;
use crate::state::State;

pub async fn run(
    address: &str,
    key: &str,
    state_path: &Path,
    config_path: Option<&Path>,
) -> Result<()> {
    let (resource_type, _) = parse_address(address)?;
    let registry = ResourceRegistry::builtin()?;
    let resource = registry.get(resource_type)?;

    let mut state = State::load(state_path)?;
    if state.resources.contains_key(address) {
        return Err(CliError::usage_with_help(
            format!("{} is already managed", address),
            "remove it from the state file or pick another address",
        ));
    }

    let service = super::connect(config_path)?;
    let mut data = resource.import(key)?;
    resource.read(&service, &mut data).await?;

    if data.id().is_none() {
        return Err(CliError::Remote {
            message: format!("repository {} does not exist on the server", key),
            help: None,
        });
    }

    state.record(address, resource.name(), &data);
    state.save(state_path)?;

    println!("{} Imported {} as {}", style("✓").green().bold(), key, address);
    Ok(())
}
