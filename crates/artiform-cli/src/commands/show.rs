//! Show command - print the managed resources

use console::style;
use std::path::Path;

use crate::display::{MASK, is_sensitive};
use crate::error::Result;
use crate::state::State;

pub fn run(state_path: &Path, json_output: bool) -> Result<()> {
    let state = State::load(state_path)?;

    if json_output {
        let masked: serde_json::Map<String, serde_json::Value> = state
            .resources
            .iter()
            .map(|(address, entry)| {
                let mut entry = serde_json::to_value(entry)?;
                if let Some(values) = entry.get_mut("values").and_then(|v| v.as_object_mut()) {
                    mask(values);
                }
                Ok((address.clone(), entry))
            })
            .collect::<serde_json::Result<_>>()?;
        println!("{}", serde_json::to_string_pretty(&masked)?);
        return Ok(());
    }

    if state.resources.is_empty() {
        println!("No resources in {}", state_path.display());
        return Ok(());
    }

    for (address, entry) in &state.resources {
        println!("{} {}", style(address).cyan().bold(), style(format!("(id: {})", entry.id)).dim());
        let mut values = entry.values.as_object().cloned().unwrap_or_default();
        mask(&mut values);
        for (field, value) in &values {
            println!("    {} = {}", field, value);
        }
    }
    Ok(())
}

fn mask(values: &mut serde_json::Map<String, serde_json::Value>) {
    for (field, value) in values.iter_mut() {
        if is_sensitive(field) && !value.is_null() {
            *value = serde_json::Value::String(MASK.into());
        }
    }
}
