//! Provider configuration
//!
//! Stored in `~/.config/artiform/provider.yaml`; every field can be
//! overridden from the environment (`ARTIFACTORY_URL`, ...).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::credentials::Credentials;
use crate::error::{RepoError, Result};

pub const ENV_URL: &str = "ARTIFACTORY_URL";
pub const ENV_ACCESS_TOKEN: &str = "ARTIFACTORY_ACCESS_TOKEN";
pub const ENV_API_KEY: &str = "ARTIFACTORY_API_KEY";
pub const ENV_USERNAME: &str = "ARTIFACTORY_USERNAME";
pub const ENV_PASSWORD: &str = "ARTIFACTORY_PASSWORD";

/// Connection settings for the artifact server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Server base URL, e.g. `https://example.jfrog.io/artifactory`
    #[serde(default)]
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            access_token: None,
            api_key: None,
            username: None,
            password: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ProviderConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Load from the default location, then apply environment overrides
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        let config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        Ok(config.with_env())
    }

    /// Load from a specific path (no environment overrides)
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save to a specific path, readable by the owner only on Unix
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut options = std::fs::OpenOptions::new();
            options.write(true).create(true).truncate(true).mode(0o600);
            std::io::Write::write_all(&mut options.open(path)?, content.as_bytes())?;
        }

        #[cfg(not(unix))]
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get default configuration path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| RepoError::InvalidConfig {
            message: "Could not determine config directory".to_string(),
        })?;
        Ok(config_dir.join("artiform").join("provider.yaml"))
    }

    /// Apply overrides from the process environment
    pub fn with_env(self) -> Self {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`; empty values are ignored
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());

        if let Some(url) = get(ENV_URL) {
            self.url = url;
        }
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(key) = get(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(username) = get(ENV_USERNAME) {
            self.username = Some(username);
        }
        if let Some(password) = get(ENV_PASSWORD) {
            self.password = Some(password);
        }
        self
    }

    /// Parse and check the server URL
    pub fn base_url(&self) -> Result<Url> {
        if self.url.is_empty() {
            return Err(RepoError::InvalidConfig {
                message: format!("Server URL is not set (use `url` or {})", ENV_URL),
            });
        }

        let parsed = Url::parse(&self.url).map_err(|e| RepoError::InvalidServerUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(RepoError::InvalidServerUrl {
                url: self.url.clone(),
                reason: format!("unsupported scheme {}, expected http or https", other),
            }),
        }
    }

    /// Credentials to send, by precedence: access token, API key, basic
    pub fn credentials(&self) -> Result<Option<Credentials>> {
        if let Some(token) = &self.access_token {
            return Ok(Some(Credentials::access_token(token)));
        }
        if let Some(key) = &self.api_key {
            return Ok(Some(Credentials::api_key(key)));
        }
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Ok(Some(Credentials::basic(username, password))),
            (Some(_), None) => Err(RepoError::InvalidConfig {
                message: format!("username is set but password is missing (set {})", ENV_PASSWORD),
            }),
            (None, Some(_)) => Err(RepoError::InvalidConfig {
                message: format!("password is set but username is missing (set {})", ENV_USERNAME),
            }),
            (None, None) => Ok(None),
        }
    }
}
