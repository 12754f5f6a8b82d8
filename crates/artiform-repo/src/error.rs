//! Error types for repository resource operations

use artiform_core::{CoreError, ValidationErrorInfo};
use thiserror::Error;

/// Repository resource errors
#[derive(Debug, Error)]
pub enum RepoError {
    // ============ Marshalling Errors ============
    #[error("Validation failed for {resource}:\n{}", format_validation(.errors))]
    Validation {
        resource: String,
        errors: Vec<ValidationErrorInfo>,
    },

    #[error("Marshal error: {0}")]
    Marshal(#[source] CoreError),

    #[error("Unknown resource type: {name}")]
    UnknownResourceType { name: String },

    #[error("Resource type already registered: {name}")]
    DuplicateResourceType { name: String },

    // ============ Remote Errors ============
    #[error("Repository not found: {key}")]
    NotFound { key: String },

    #[error("Remote error: {status} - {message}")]
    Remote { status: u16, message: String },

    #[error("Network error: {message}")]
    NetworkError { message: String },

    #[error("Request timeout after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Rate limited by server. Retry after {retry_after} seconds")]
    RateLimited { retry_after: u64 },

    // ============ Authentication Errors ============
    #[error("Authentication required for {url}")]
    AuthRequired { url: String },

    #[error("Authentication failed: {message}")]
    AuthFailed { message: String },

    // ============ Configuration Errors ============
    #[error("Invalid server URL: {url} - {reason}")]
    InvalidServerUrl { url: String, reason: String },

    #[error("Invalid provider configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid repository key: {key:?}")]
    InvalidKey { key: String },

    // ============ IO Errors ============
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for repository resource operations
pub type Result<T> = std::result::Result<T, RepoError>;

impl RepoError {
    /// Whether this error only signals that the remote repository is absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepoError::NotFound { .. })
    }
}

fn format_validation(errors: &[ValidationErrorInfo]) -> String {
    errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n")
}

impl From<reqwest::Error> for RepoError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RepoError::Timeout { seconds: 30 }
        } else if e.is_connect() {
            RepoError::NetworkError {
                message: format!("Connection failed: {}", e),
            }
        } else if let Some(status) = e.status() {
            RepoError::Remote {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            RepoError::NetworkError {
                message: e.to_string(),
            }
        }
    }
}

impl From<serde_yaml::Error> for RepoError {
    fn from(e: serde_yaml::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(e: serde_json::Error) -> Self {
        RepoError::Serialization(e.to_string())
    }
}

impl From<CoreError> for RepoError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation { errors } => RepoError::Validation {
                resource: String::new(),
                errors,
            },
            other => RepoError::Marshal(other),
        }
    }
}
