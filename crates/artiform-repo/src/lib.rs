//! Artiform Repository Resources
//!
//! This crate turns declared configuration into repository resources on an
//! artifact server:
//!
//! - **Models**: typed wire models per repository variant, composed from
//!   shared base and capability blocks
//! - **Variants**: schema plus unpack/pack pair for every supported type
//! - **CRUD adapter**: create/read/update/delete/exists, generic over the model
//! - **Registry**: resource type name -> schema and lifecycle operations
//! - **Services**: HTTP client for the server's REST API, in-memory service
//!   for tests
//!
//! ## Example
//!
//! ```rust,no_run
//! use artiform_repo::{HttpRepositoryService, ProviderConfig, ResourceRegistry};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = ResourceRegistry::builtin()?;
//! let service = HttpRepositoryService::new(&ProviderConfig::load()?)?;
//!
//! let cargo = registry.get("artifactory_remote_cargo_repository")?;
//! let mut data = cargo.data_from_json(&serde_json::json!({
//!     "key": "crates-remote",
//!     "url": "https://index.crates.io",
//!     "git_registry_url": "https://github.com/rust-lang/crates.io-index",
//! }))?;
//!
//! cargo.create(&service, &mut data).await?;
//! assert_eq!(data.id(), Some("crates-remote"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod credentials;
pub mod crud;
pub mod error;
pub mod http;
pub mod marshal;
pub mod memory;
pub mod model;
pub mod registry;
pub mod schema;
pub mod service;
pub mod variants;

// Re-exports for convenience
pub use config::ProviderConfig;
pub use credentials::Credentials;
pub use crud::{
    BlankFn, Codec, PackFn, RepositoryResource, Resource, UnpackFn, repo_create, repo_delete,
    repo_exists, repo_read, repo_update,
};
pub use error::{RepoError, Result};
pub use http::HttpRepositoryService;
pub use memory::{InMemoryRepositoryService, OperationCounts};
pub use model::RepositoryClass;
pub use registry::ResourceRegistry;
pub use service::RepositoryService;
