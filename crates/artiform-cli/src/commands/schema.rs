//! Schema command - print the fields of a resource type

use artiform_repo::ResourceRegistry;

use crate::display::display_schema;
use crate::error::Result;

pub fn run(resource_type: &str, json_schema: bool) -> Result<()> {
    let registry = ResourceRegistry::builtin()?;
    let resource = registry.get(resource_type)?;

    if json_schema {
        let schema = resource.schema().to_json_schema();
        println!("{}", serde_json::to_string_pretty(&schema)?);
    } else {
        display_schema(resource.name(), resource.schema());
    }
    Ok(())
}
