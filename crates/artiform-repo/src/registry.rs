//! Resource registry
//!
//! Maps resource type names to their [`Resource`] implementation. The builtin
//! registry is assembled explicitly, once, from the variant modules.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::crud::Resource;
use crate::error::{RepoError, Result};
use crate::variants::{local, remote, virtual_repo};

#[derive(Clone, Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<String, Arc<dyn Resource>>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every repository type this crate implements
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();

        registry.register(Arc::new(local::legacy_local_resource()?))?;
        registry.register(Arc::new(local::local_generic_resource()?))?;
        registry.register(Arc::new(local::local_maven_resource()?))?;
        registry.register(Arc::new(local::local_gradle_resource()?))?;
        registry.register(Arc::new(local::local_debian_resource()?))?;
        registry.register(Arc::new(local::local_docker_resource()?))?;
        registry.register(Arc::new(local::local_rpm_resource()?))?;

        registry.register(Arc::new(remote::remote_generic_resource()?))?;
        registry.register(Arc::new(remote::remote_cargo_resource()?))?;
        registry.register(Arc::new(remote::remote_docker_resource()?))?;
        registry.register(Arc::new(remote::remote_maven_resource()?))?;

        registry.register(Arc::new(virtual_repo::virtual_generic_resource()?))?;
        registry.register(Arc::new(virtual_repo::virtual_maven_resource()?))?;

        tracing::debug!(count = registry.len(), "registered resource types");
        Ok(registry)
    }

    /// Add a resource type; names are unique
    pub fn register(&mut self, resource: Arc<dyn Resource>) -> Result<()> {
        let name = resource.name().to_string();
        if self.resources.contains_key(&name) {
            return Err(RepoError::DuplicateResourceType { name });
        }
        self.resources.insert(name, resource);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Resource>> {
        self.resources
            .get(name)
            .cloned()
            .ok_or_else(|| RepoError::UnknownResourceType {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.resources.keys().map(String::as_str).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Resource>)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = ResourceRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 13);
        for name in registry.names() {
            assert!(name.starts_with("artifactory_"), "{name}");
            assert!(name.ends_with("_repository"), "{name}");
        }
        assert!(registry.contains("artifactory_remote_cargo_repository"));
        assert!(registry.contains("artifactory_local_repository"));
    }

    #[test]
    fn test_unknown_type() {
        let registry = ResourceRegistry::builtin().unwrap();
        match registry.get("artifactory_remote_npm_repository") {
            Err(RepoError::UnknownResourceType { name }) => {
                assert_eq!(name, "artifactory_remote_npm_repository")
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_duplicate_registration() {
        let mut registry = ResourceRegistry::new();
        registry
            .register(Arc::new(remote::remote_cargo_resource().unwrap()))
            .unwrap();
        assert!(matches!(
            registry.register(Arc::new(remote::remote_cargo_resource().unwrap())),
            Err(RepoError::DuplicateResourceType { .. })
        ));
    }

    #[test]
    fn test_every_schema_declares_key_and_package_type() {
        let registry = ResourceRegistry::builtin().unwrap();
        for (name, resource) in registry.iter() {
            let schema = resource.schema();
            let key = schema.get("key").unwrap();
            assert!(key.required && key.force_new, "{name}");
            assert!(schema.contains("package_type"), "{name}");
        }
    }
}
