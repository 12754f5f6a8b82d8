//! In-memory repository service
//!
//! Behaves like the server as far as the CRUD adapter can observe: keys are
//! unique, updates merge into the stored configuration, unknown keys are
//! `NotFound`, and package-type aliases are normalized on write. Useful for
//! tests and dry runs without a server.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use artiform_core::deep_merge;

use crate::error::{RepoError, Result};
use crate::service::RepositoryService;

/// Counts of operations performed, for test assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub creates: usize,
    pub gets: usize,
    pub updates: usize,
    pub deletes: usize,
    pub exists: usize,
}

impl OperationCounts {
    pub fn total(&self) -> usize {
        self.creates + self.gets + self.updates + self.deletes + self.exists
    }
}

#[derive(Default)]
struct State {
    repositories: BTreeMap<String, JsonValue>,
    operations: OperationCounts,
}

/// In-memory service, cheap to clone; clones share the same store
#[derive(Clone, Default)]
pub struct InMemoryRepositoryService {
    state: Arc<RwLock<State>>,
    /// packageType alias -> canonical value applied on write
    package_type_aliases: BTreeMap<String, String>,
    /// Server-side defaults filled in under every created repository
    defaults: Option<JsonValue>,
}

impl InMemoryRepositoryService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `alias` back as `canonical` after a write
    pub fn with_package_type_alias(
        mut self,
        alias: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Self {
        self.package_type_aliases
            .insert(alias.into(), canonical.into());
        self
    }

    /// Fill `defaults` into every created repository, under the submitted body
    pub fn with_server_defaults(mut self, defaults: JsonValue) -> Self {
        self.defaults = Some(defaults);
        self
    }

    /// Store a repository directly, bypassing counts and normalization
    pub async fn insert_repository(&self, key: &str, body: JsonValue) {
        let mut state = self.state.write().await;
        state.repositories.insert(key.to_string(), body);
    }

    /// Stored configuration for `key`
    pub async fn repository(&self, key: &str) -> Option<JsonValue> {
        self.state.read().await.repositories.get(key).cloned()
    }

    /// Keys of every stored repository
    pub async fn operation_counts(&self) -> OperationCounts {
        self.state.read().await.operations.clone()
    }

    fn normalize(&self, key: &str, body: &mut JsonValue) {
        let Some(obj) = body.as_object_mut() else {
            return;
        };
        obj.insert("key".to_string(), JsonValue::String(key.to_string()));

        let canonical = obj
            .get("packageType")
            .and_then(JsonValue::as_str)
            .and_then(|pt| self.package_type_aliases.get(pt))
            .cloned();
        if let Some(canonical) = canonical {
            obj.insert("packageType".to_string(), JsonValue::String(canonical));
        }
    }
}

fn not_found(key: &str) -> RepoError {
    RepoError::NotFound {
        key: key.to_string(),
    }
}

#[async_trait]
impl RepositoryService for InMemoryRepositoryService {
    async fn create_repository(&self, key: &str, body: &JsonValue) -> Result<()> {
        let mut state = self.state.write().await;
        state.operations.creates += 1;

        if !body.is_object() {
            return Err(RepoError::Remote {
                status: 400,
                message: "Repository configuration must be a JSON object".to_string(),
            });
        }
        if state.repositories.contains_key(key) {
            return Err(RepoError::Remote {
                status: 400,
                message: format!("Case insensitive repository key already exists: '{}'", key),
            });
        }

        let mut stored = self
            .defaults
            .clone()
            .unwrap_or_else(|| JsonValue::Object(Default::default()));
        deep_merge(&mut stored, body);
        self.normalize(key, &mut stored);

        state.repositories.insert(key.to_string(), stored);
        Ok(())
    }

    async fn get_repository(&self, key: &str) -> Result<JsonValue> {
        let mut state = self.state.write().await;
        state.operations.gets += 1;
        state
            .repositories
            .get(key)
            .cloned()
            .ok_or_else(|| not_found(key))
    }

    async fn update_repository(&self, key: &str, body: &JsonValue) -> Result<()> {
        let mut state = self.state.write().await;
        state.operations.updates += 1;

        let mut stored = state
            .repositories
            .get(key)
            .cloned()
            .ok_or_else(|| not_found(key))?;
        deep_merge(&mut stored, body);
        self.normalize(key, &mut stored);

        state.repositories.insert(key.to_string(), stored);
        Ok(())
    }

    async fn delete_repository(&self, key: &str) -> Result<()> {
        let mut state = self.state.write().await;
        state.operations.deletes += 1;
        state
            .repositories
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| not_found(key))
    }

    async fn repository_exists(&self, key: &str) -> Result<bool> {
        let mut state = self.state.write().await;
        state.operations.exists += 1;
        Ok(state.repositories.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_create_get_delete() {
        let service = InMemoryRepositoryService::new();
        let body = json!({ "key": "libs", "rclass": "local", "packageType": "generic" });

        service.create_repository("libs", &body).await.unwrap();
        assert_eq!(service.get_repository("libs").await.unwrap(), body);
        assert!(service.repository_exists("libs").await.unwrap());

        service.delete_repository("libs").await.unwrap();
        assert!(service.delete_repository("libs").await.unwrap_err().is_not_found());
        assert!(service.get_repository("libs").await.unwrap_err().is_not_found());
        assert!(!service.repository_exists("libs").await.unwrap());

        let counts = service.operation_counts().await;
        assert_eq!(counts.creates, 1);
        assert_eq!(counts.deletes, 2);
        assert_eq!(counts.exists, 2);
    }

    #[tokio::test]
    async fn test_duplicate_create_is_rejected() {
        let service = InMemoryRepositoryService::new();
        let body = json!({ "key": "libs", "rclass": "local", "packageType": "generic" });
        service.create_repository("libs", &body).await.unwrap();

        match service.create_repository("libs", &body).await.unwrap_err() {
            RepoError::Remote { status, message } => {
                assert_eq!(status, 400);
                assert!(message.contains("libs"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_alias_and_defaults_applied_on_write() {
        let service = InMemoryRepositoryService::new()
            .with_package_type_alias("yum", "rpm")
            .with_server_defaults(json!({ "xrayIndex": false, "repoLayoutRef": "simple-default" }));

        let body = json!({ "key": "rpms", "rclass": "local", "packageType": "yum", "xrayIndex": true });
        service.create_repository("rpms", &body).await.unwrap();

        let stored = service.repository("rpms").await.unwrap();
        assert_eq!(stored["packageType"], "rpm");
        assert_eq!(stored["xrayIndex"], true);
        assert_eq!(stored["repoLayoutRef"], "simple-default");
    }

    #[tokio::test]
    async fn test_update_merges_and_requires_existing() {
        let service = InMemoryRepositoryService::new();
        let err = service
            .update_repository("libs", &json!({ "notes": "x" }))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        service
            .insert_repository("libs", json!({ "key": "libs", "notes": "a", "description": "d" }))
            .await;
        service
            .update_repository("libs", &json!({ "key": "libs", "notes": "b" }))
            .await
            .unwrap();

        let stored = service.repository("libs").await.unwrap();
        assert_eq!(stored["notes"], "b");
        assert_eq!(stored["description"], "d");
    }
}
