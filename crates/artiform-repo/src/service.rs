//! Remote repository service trait
//!
//! The CRUD adapter only needs these operations keyed by repository key.
//! Bodies are the JSON wire form of a variant's model; the service never
//! interprets them beyond transport.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;

/// Remote service managing repository configurations
#[async_trait]
pub trait RepositoryService: Send + Sync {
    /// Create a repository; rejected when the key is taken
    async fn create_repository(&self, key: &str, body: &JsonValue) -> Result<()>;

    /// Fetch a repository configuration, `RepoError::NotFound` when absent
    async fn get_repository(&self, key: &str) -> Result<JsonValue>;

    /// Update an existing repository
    async fn update_repository(&self, key: &str, body: &JsonValue) -> Result<()>;

    /// Delete a repository, `RepoError::NotFound` when absent
    async fn delete_repository(&self, key: &str) -> Result<()>;

    /// Whether a repository exists
    async fn repository_exists(&self, key: &str) -> Result<bool> {
        match self.get_repository(key).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
