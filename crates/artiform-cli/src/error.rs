//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use artiform_repo::RepoError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Configuration rejected by a resource schema
    #[error("Validation failed: {message}")]
    #[diagnostic(code(artiform::cli::validation))]
    Validation {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Provider configuration missing or invalid
    #[error("Provider configuration error: {message}")]
    #[diagnostic(
        code(artiform::cli::config),
        help("set ARTIFACTORY_URL and a credential, or pass --config <FILE>")
    )]
    Config { message: String },

    /// The server rejected a request or could not be reached
    #[error("{message}")]
    #[diagnostic(code(artiform::cli::remote))]
    Remote {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Manifest or state file could not be used
    #[error("{message}")]
    #[diagnostic(code(artiform::cli::input))]
    Input {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid arguments
    #[error("{message}")]
    #[diagnostic(code(artiform::cli::usage))]
    Usage {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(artiform::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(artiform::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Validation { .. } => exit_codes::VALIDATION_ERROR,
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Remote { .. } => exit_codes::REMOTE_ERROR,
            CliError::Input { .. } => exit_codes::ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an input error (manifest or state file problem)
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: None,
        }
    }

    /// Create an input error with help text
    pub fn input_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a usage error with help text
    pub fn usage_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: Some(help.into()),
        }
    }
}

impl From<RepoError> for CliError {
    fn from(err: RepoError) -> Self {
        let message = err.to_string();
        match err {
            RepoError::Validation { .. } => CliError::Validation {
                message,
                help: Some("run `artiform schema <TYPE>` to list the accepted fields".to_string()),
            },
            RepoError::UnknownResourceType { .. } => CliError::Usage {
                message,
                help: Some("run `artiform types` to list the supported resource types".to_string()),
            },
            RepoError::InvalidKey { .. } => CliError::Usage {
                message,
                help: None,
            },
            RepoError::InvalidConfig { .. } | RepoError::InvalidServerUrl { .. } => {
                CliError::Config { message }
            }
            RepoError::AuthRequired { .. } | RepoError::AuthFailed { .. } => CliError::Remote {
                message,
                help: Some("check the access token, API key or username/password".to_string()),
            },
            RepoError::RateLimited { retry_after } => CliError::Remote {
                message,
                help: Some(format!("retry in {} seconds", retry_after)),
            },
            RepoError::Remote { .. }
            | RepoError::NotFound { .. }
            | RepoError::NetworkError { .. }
            | RepoError::Timeout { .. } => CliError::Remote {
                message,
                help: None,
            },
            RepoError::Io(_) => CliError::Io { message },
            RepoError::Marshal(_)
            | RepoError::DuplicateResourceType { .. }
            | RepoError::Serialization(_) => CliError::Internal { message },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(err.to_string())
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
