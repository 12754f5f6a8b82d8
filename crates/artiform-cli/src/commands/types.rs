//! Types command - list supported resource types

use artiform_repo::ResourceRegistry;
use console::style;

use crate::error::Result;

pub fn run(json_output: bool) -> Result<()> {
    let registry = ResourceRegistry::builtin()?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&registry.names())?);
        return Ok(());
    }

    for (name, resource) in registry.iter() {
        let required = resource.schema().required_fields().join(", ");
        println!("{}  {}", name, style(format!("requires: {}", required)).dim());
    }
    Ok(())
}
