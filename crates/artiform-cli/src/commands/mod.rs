//! CLI command implementations

pub mod apply;
pub mod destroy;
pub mod import;
pub mod plan;
pub mod refresh;
pub mod schema;
pub mod show;
pub mod types;
pub mod validate;

use artiform_repo::{HttpRepositoryService, ProviderConfig};
use std::path::Path;

use crate::error::Result;

/// Provider configuration from `--config` or the default location, with
/// environment overrides applied last
pub fn load_config(path: Option<&Path>) -> Result<ProviderConfig> {
    let config = match path {
        Some(path) => ProviderConfig::load_from(path)?.with_env(),
        None => ProviderConfig::load()?,
    };
    Ok(config)
}

pub fn connect(config_path: Option<&Path>) -> Result<HttpRepositoryService> {
    let config = load_config(config_path)?;
    let service = HttpRepositoryService::new(&config)?;
    tracing::debug!(url = %service.base_url(), "connected");
    Ok(service)
}
