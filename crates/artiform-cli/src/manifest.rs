//! Declared resources, read from a YAML manifest
//!
//! ```yaml
//! resources:
//!   - type: artifactory_remote_cargo_repository
//!     name: crates
//!     config:
//!       key: crates-remote
//!       url: https://index.crates.io
//!       git_registry_url: https://github.com/rust-lang/crates.io-index
//! ```
//!
//! A resource is addressed as `<type>.<name>`; `name` defaults to the key.

use artiform_core::ResourceData;
use artiform_repo::{RepoError, Resource, ResourceRegistry};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use crate::error::{CliError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub resources: Vec<ResourceBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceBlock {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub config: JsonValue,
}

/// A manifest entry bound to its registered resource type
pub struct Declared {
    pub address: String,
    pub resource: Arc<dyn Resource>,
    pub data: ResourceData,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::Io {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::parse(&content).map_err(|e| match e {
            CliError::Input { message, help } => CliError::Input {
                message: format!("{}: {}", path.display(), message),
                help,
            },
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            CliError::input_with_help(
                format!("invalid manifest: {}", e),
                "expected a `resources` list of {type, name, config} entries",
            )
        })
    }

    /// Bind every entry; addresses must be unique
    pub fn resolve(&self, registry: &ResourceRegistry) -> Result<Vec<Declared>> {
        let mut seen = BTreeSet::new();
        let mut declared = Vec::with_capacity(self.resources.len());

        for block in &self.resources {
            let entry = block.declare(registry)?;
            if !seen.insert(entry.address.clone()) {
                return Err(CliError::input(format!(
                    "duplicate resource address {}",
                    entry.address
                )));
            }
            declared.push(entry);
        }

        Ok(declared)
    }
}

impl ResourceBlock {
    /// `<type>.<name>`, falling back to the configured key for the name
    pub fn address(&self) -> String {
        let name = self
            .name
            .clone()
            .or_else(|| {
                self.config
                    .get("key")
                    .and_then(JsonValue::as_str)
                    .map(String::from)
            })
            .unwrap_or_default();
        format!("{}.{}", self.resource_type, name)
    }

    pub fn declare(&self, registry: &ResourceRegistry) -> Result<Declared> {
        let address = self.address();
        if address.ends_with('.') {
            return Err(CliError::input_with_help(
                format!("resource of type {} has neither a name nor a key", self.resource_type),
                "add `name:` or `config.key:`",
            ));
        }

        let resource = registry.get(&self.resource_type)?;
        let config = if self.config.is_null() {
            JsonValue::Object(Default::default())
        } else {
            self.config.clone()
        };
        let data = resource.data_from_json(&config).map_err(|e| {
            let message = match e {
                RepoError::Marshal(inner) => inner.to_string(),
                other => other.to_string(),
            };
            CliError::Validation {
                message: format!("{}: {}", address, message),
                help: Some(format!(
                    "run `artiform schema {}` to list the accepted fields",
                    self.resource_type
                )),
            }
        })?;

        Ok(Declared {
            address,
            resource,
            data,
        })
    }
}

/// Split `<type>.<name>`
pub fn parse_address(address: &str) -> Result<(&str, &str)> {
    match address.split_once('.') {
        Some((resource_type, name)) if !resource_type.is_empty() && !name.is_empty() => {
            Ok((resource_type, name))
        }
        _ => Err(CliError::usage_with_help(
            format!("invalid resource address {:?}", address),
            "addresses look like artifactory_local_generic_repository.files",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ResourceRegistry {
        ResourceRegistry::builtin().unwrap()
    }

    #[test]
    fn test_parse_and_resolve() {
        let manifest = Manifest::parse(
            r#"
resources:
  - type: artifactory_local_generic_repository
    config:
      key: files
  - type: artifactory_remote_cargo_repository
    name: crates
    config:
      key: crates-remote
      url: https://index.crates.io
      git_registry_url: https://github.com/rust-lang/crates.io-index
"#,
        )
        .unwrap();

        let declared = manifest.resolve(&registry()).unwrap();
        let addresses: Vec<&str> = declared.iter().map(|d| d.address.as_str()).collect();
        assert_eq!(
            addresses,
            [
                "artifactory_local_generic_repository.files",
                "artifactory_remote_cargo_repository.crates"
            ]
        );
        assert_eq!(
            declared[1].data.get_string("key", false).unwrap(),
            "crates-remote"
        );
    }

    #[test]
    fn test_duplicate_address() {
        let manifest = Manifest::parse(
            r#"
resources:
  - type: artifactory_local_generic_repository
    config: { key: files }
  - type: artifactory_local_generic_repository
    config: { key: files }
"#,
        )
        .unwrap();
        let err = manifest.resolve(&registry()).err().unwrap();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_unknown_field_is_a_validation_error() {
        let manifest = Manifest::parse(
            r#"
resources:
  - type: artifactory_local_generic_repository
    config: { key: files, gitRegistryUrl: "https://x" }
"#,
        )
        .unwrap();
        let err = manifest.resolve(&registry()).err().unwrap();
        assert!(matches!(err, CliError::Validation { .. }));
        assert!(err.to_string().contains("gitRegistryUrl"));
    }

    #[test]
    fn test_computed_package_type_is_a_validation_error() {
        let manifest = Manifest::parse(
            r#"
resources:
  - type: artifactory_local_docker_repository
    config: { key: images, package_type: maven }
"#,
        )
        .unwrap();
        let err = manifest.resolve(&registry()).err().unwrap();
        assert!(matches!(err, CliError::Validation { .. }));
        assert!(err.to_string().contains("package_type"));
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(
            parse_address("artifactory_local_generic_repository.files").unwrap(),
            ("artifactory_local_generic_repository", "files")
        );
        assert!(parse_address("files").is_err());
        assert!(parse_address(".files").is_err());
    }
}
