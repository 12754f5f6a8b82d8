//! Local state file
//!
//! Persisted configuration data of every managed resource, keyed by address.
//! Written after each successful remote operation so an interrupted apply
//! keeps what it already did.

use artiform_core::ResourceData;
use artiform_repo::Resource;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{CliError, Result};

pub const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    pub version: u32,

    #[serde(default)]
    pub resources: BTreeMap<String, StateEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub id: String,
    pub values: JsonValue,
}

impl Default for State {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            resources: BTreeMap::new(),
        }
    }
}

impl State {
    /// Read the state file; a missing file is an empty state
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let state: Self = serde_json::from_str(&content).map_err(|e| {
            CliError::input(format!("{}: invalid state file: {}", path.display(), e))
        })?;

        if state.version != STATE_VERSION {
            return Err(CliError::input(format!(
                "{}: unsupported state version {} (expected {})",
                path.display(),
                state.version,
                STATE_VERSION
            )));
        }
        Ok(state)
    }

    /// Write through a temporary file so a crash never truncates the state
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Record `data`; data without an id removes the address
    pub fn record(&mut self, address: &str, resource_type: &str, data: &ResourceData) {
        match StateEntry::from_data(resource_type, data) {
            Some(entry) => {
                self.resources.insert(address.to_string(), entry);
            }
            None => {
                self.resources.remove(address);
            }
        }
    }
}

impl StateEntry {
    pub fn from_data(resource_type: &str, data: &ResourceData) -> Option<Self> {
        Some(Self {
            resource_type: resource_type.to_string(),
            id: data.id()?.to_string(),
            values: data.to_json(),
        })
    }

    /// Rebuild state data for `resource`, id included
    pub fn to_data(&self, resource: &dyn Resource) -> Result<ResourceData> {
        let mut data = resource.state_from_json(&self.values).map_err(|e| {
            CliError::input_with_help(
                format!("state entry {} no longer matches its schema: {}", self.id, e),
                "run `artiform refresh` or remove the entry from the state file",
            )
        })?;
        data.set_id(self.id.clone());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artiform_repo::ResourceRegistry;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let state = State::load(&dir.path().join("absent.json")).unwrap();
        assert!(state.resources.is_empty());
        assert_eq!(state.version, STATE_VERSION);
    }

    #[test]
    fn test_record_save_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let registry = ResourceRegistry::builtin().unwrap();
        let resource = registry.get("artifactory_local_generic_repository").unwrap();
        let mut data = resource
            .data_from_json(&json!({ "key": "files", "notes": "n" }))
            .unwrap();
        let mut w = data.writer();
        w.set("package_type", "generic");
        w.finish("test").unwrap();
        data.set_id("files");

        let mut state = State::default();
        state.record("artifactory_local_generic_repository.files", resource.name(), &data);
        state.save(&path).unwrap();

        let loaded = State::load(&path).unwrap();
        let entry = &loaded.resources["artifactory_local_generic_repository.files"];
        assert_eq!(entry.id, "files");

        let restored = entry.to_data(resource.as_ref()).unwrap();
        assert_eq!(restored.id(), Some("files"));
        assert_eq!(restored.get_string("notes", false).unwrap(), "n");
        assert_eq!(restored.get_string("package_type", false).unwrap(), "generic");
    }

    #[test]
    fn test_record_without_id_removes() {
        let registry = ResourceRegistry::builtin().unwrap();
        let resource = registry.get("artifactory_local_generic_repository").unwrap();
        let mut data = resource.data_from_json(&json!({ "key": "files" })).unwrap();
        data.set_id("files");

        let mut state = State::default();
        state.record("a.files", resource.name(), &data);
        assert_eq!(state.resources.len(), 1);

        data.clear_id();
        state.record("a.files", resource.name(), &data);
        assert!(state.resources.is_empty());
    }

    #[test]
    fn test_rejects_other_versions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"version": 9, "resources": {}}"#).unwrap();
        assert!(State::load(&path).is_err());
    }
}
