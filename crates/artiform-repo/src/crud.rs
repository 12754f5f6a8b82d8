//! Generic CRUD adapter
//!
//! Every variant goes through the same sequence: unpack the configuration
//! into its wire model, send it, then read the repository back and pack the
//! server's answer into the configuration. The server is the source of truth
//! after any write; local assumptions about defaults are never kept.
//!
//! Lifecycle of one resource:
//!
//! ```text
//! Absent --create--> Present --update--> Present
//!                       |
//!                       +---delete--> Absent
//! ```
//!
//! A read that finds the repository gone clears the id, which the host takes
//! as `Absent` and schedules a re-create.

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::sync::Arc;

use artiform_core::{CoreError, ResourceData, Schema, SchemaValidator, deep_merge};

use crate::error::{RepoError, Result};
use crate::schema::is_valid_repo_key;
use crate::service::RepositoryService;

/// Configuration data -> (wire model, repository key)
pub type UnpackFn<M> = fn(&ResourceData) -> artiform_core::Result<(M, String)>;

/// Wire model -> configuration data
pub type PackFn<M> = fn(&M, &mut ResourceData) -> artiform_core::Result<()>;

/// Model with only the variant's discriminators set
pub type BlankFn<M> = fn() -> M;

/// The marshalling functions of one variant
pub struct Codec<M> {
    pub unpack: UnpackFn<M>,
    pub pack: PackFn<M>,
    pub blank: BlankFn<M>,
}

impl<M> Clone for Codec<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Codec<M> {}

fn marshal_error(e: CoreError) -> RepoError {
    RepoError::Marshal(e)
}

/// Drop `null` members so they fall back to the blank model's values
fn strip_nulls(value: &mut JsonValue) {
    if let JsonValue::Object(map) = value {
        map.retain(|_, v| !v.is_null());
        map.values_mut().for_each(strip_nulls);
    }
}

/// Unpack and serialize; the key must be non-empty
pub fn unpack_body<M: Serialize>(codec: &Codec<M>, data: &ResourceData) -> Result<(JsonValue, String)> {
    let (model, key) = (codec.unpack)(data).map_err(marshal_error)?;
    if key.is_empty() {
        return Err(RepoError::InvalidKey { key });
    }
    let body = serde_json::to_value(&model)?;
    Ok((body, key))
}

/// Fetch the repository named by the id and pack it into `data`
///
/// Not found clears the id and succeeds. Without an id there is nothing to
/// read.
pub async fn repo_read<M>(
    service: &dyn RepositoryService,
    codec: &Codec<M>,
    data: &mut ResourceData,
) -> Result<()>
where
    M: Serialize + DeserializeOwned + Send,
{
    let Some(key) = data.id().map(String::from) else {
        return Ok(());
    };

    let mut response = match service.get_repository(&key).await {
        Ok(response) => response,
        Err(e) if e.is_not_found() => {
            tracing::warn!(key = %key, "repository no longer exists, removing from state");
            data.clear_id();
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    strip_nulls(&mut response);

    let mut merged = serde_json::to_value((codec.blank)())?;
    deep_merge(&mut merged, &response);
    let model: M = serde_json::from_value(merged)?;

    (codec.pack)(&model, data).map_err(marshal_error)?;
    tracing::debug!(key = %key, "read repository");
    Ok(())
}

/// Unpack, create, then read back
pub async fn repo_create<M>(
    service: &dyn RepositoryService,
    codec: &Codec<M>,
    data: &mut ResourceData,
) -> Result<()>
where
    M: Serialize + DeserializeOwned + Send,
{
    let (body, key) = unpack_body(codec, data)?;
    service.create_repository(&key, &body).await?;
    tracing::info!(key = %key, "created repository");

    data.set_id(key);
    repo_read(service, codec, data).await
}

/// Unpack, update, then read back
pub async fn repo_update<M>(
    service: &dyn RepositoryService,
    codec: &Codec<M>,
    data: &mut ResourceData,
) -> Result<()>
where
    M: Serialize + DeserializeOwned + Send,
{
    let (body, key) = unpack_body(codec, data)?;
    let target = data.id().map(String::from).unwrap_or(key);
    service.update_repository(&target, &body).await?;
    tracing::info!(key = %target, "updated repository");

    data.set_id(target);
    repo_read(service, codec, data).await
}

/// Delete the repository named by the id; already gone is success
pub async fn repo_delete(service: &dyn RepositoryService, data: &ResourceData) -> Result<()> {
    let Some(key) = data.id() else {
        return Ok(());
    };

    match service.delete_repository(key).await {
        Ok(()) => {
            tracing::info!(key = %key, "deleted repository");
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            tracing::debug!(key = %key, "repository already deleted");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Probe the repository named by the id
pub async fn repo_exists(service: &dyn RepositoryService, data: &ResourceData) -> Result<bool> {
    let Some(key) = data.id() else {
        return Ok(false);
    };

    match service.repository_exists(key).await {
        Ok(exists) => Ok(exists),
        Err(e) if e.is_not_found() => Ok(false),
        Err(e) => Err(e),
    }
}

/// One registered resource type: schema plus lifecycle operations
#[async_trait]
pub trait Resource: Send + Sync {
    /// Resource type name, e.g. `artifactory_remote_cargo_repository`
    fn name(&self) -> &str;

    fn schema(&self) -> &Arc<Schema>;

    /// Empty configuration data bound to this schema
    fn new_data(&self) -> ResourceData {
        ResourceData::new(Arc::clone(self.schema()))
    }

    /// Configuration data from a JSON object of field values
    ///
    /// Server-computed fields are rejected.
    fn data_from_json(&self, json: &JsonValue) -> Result<ResourceData> {
        ResourceData::from_config(Arc::clone(self.schema()), json).map_err(RepoError::from)
    }

    /// Persisted state, which carries the server's computed values
    fn state_from_json(&self, json: &JsonValue) -> Result<ResourceData> {
        ResourceData::from_json(Arc::clone(self.schema()), json).map_err(RepoError::from)
    }

    /// Check field values against the schema's validators
    fn validate(&self, data: &ResourceData) -> Result<()>;

    /// Wire payload the configuration would send, with its key
    fn payload(&self, data: &ResourceData) -> Result<(JsonValue, String)>;

    async fn create(&self, service: &dyn RepositoryService, data: &mut ResourceData) -> Result<()>;

    async fn read(&self, service: &dyn RepositoryService, data: &mut ResourceData) -> Result<()>;

    async fn update(&self, service: &dyn RepositoryService, data: &mut ResourceData) -> Result<()>;

    async fn delete(&self, service: &dyn RepositoryService, data: &ResourceData) -> Result<()>;

    async fn exists(&self, service: &dyn RepositoryService, data: &ResourceData) -> Result<bool>;

    /// Passthrough import: the key becomes the id, a read fills in the rest
    fn import(&self, key: &str) -> Result<ResourceData> {
        if !is_valid_repo_key(key) {
            return Err(RepoError::InvalidKey {
                key: key.to_string(),
            });
        }
        let mut data = self.new_data();
        data.set_id(key);
        Ok(data)
    }
}

/// [`Resource`] implementation shared by every repository variant
pub struct RepositoryResource<M> {
    name: &'static str,
    schema: Arc<Schema>,
    validator: SchemaValidator,
    codec: Codec<M>,
}

impl<M> RepositoryResource<M> {
    pub fn new(name: &'static str, schema: Schema, codec: Codec<M>) -> Result<Self> {
        let validator = SchemaValidator::new(&schema)?;
        Ok(Self {
            name,
            schema: Arc::new(schema),
            validator,
            codec,
        })
    }
}

#[async_trait]
impl<M> Resource for RepositoryResource<M>
where
    M: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        self.name
    }

    fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    fn validate(&self, data: &ResourceData) -> Result<()> {
        let result = self.validator.validate_data(data);
        if result.is_valid {
            Ok(())
        } else {
            Err(RepoError::Validation {
                resource: self.name.to_string(),
                errors: result.errors,
            })
        }
    }

    fn payload(&self, data: &ResourceData) -> Result<(JsonValue, String)> {
        unpack_body(&self.codec, data)
    }

    async fn create(&self, service: &dyn RepositoryService, data: &mut ResourceData) -> Result<()> {
        self.validate(data)?;
        repo_create(service, &self.codec, data).await
    }

    async fn read(&self, service: &dyn RepositoryService, data: &mut ResourceData) -> Result<()> {
        repo_read(service, &self.codec, data).await
    }

    async fn update(&self, service: &dyn RepositoryService, data: &mut ResourceData) -> Result<()> {
        self.validate(data)?;
        repo_update(service, &self.codec, data).await
    }

    async fn delete(&self, service: &dyn RepositoryService, data: &ResourceData) -> Result<()> {
        repo_delete(service, data).await
    }

    async fn exists(&self, service: &dyn RepositoryService, data: &ResourceData) -> Result<bool> {
        repo_exists(service, data).await
    }
}
