//! Credentials for the artifact server
//!
//! Three schemes are supported. Access tokens and basic credentials go in the
//! `Authorization` header; API keys use the server's own `X-JFrog-Art-Api`
//! header.

use base64::Engine;
use std::fmt;

/// Header carrying API keys
pub const API_KEY_HEADER: &str = "X-JFrog-Art-Api";

/// Credential types supported
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Bearer access token
    AccessToken { token: String },

    /// Legacy API key
    ApiKey { key: String },

    /// Basic authentication (username/password)
    Basic { username: String, password: String },
}

impl Credentials {
    pub fn access_token(token: impl Into<String>) -> Self {
        Credentials::AccessToken {
            token: token.into(),
        }
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Credentials::ApiKey { key: key.into() }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Header name and value to attach to every request
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Credentials::AccessToken { token } => ("Authorization", format!("Bearer {}", token)),
            Credentials::ApiKey { key } => (API_KEY_HEADER, key.clone()),
            Credentials::Basic { username, password } => {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                ("Authorization", format!("Basic {}", encoded))
            }
        }
    }

    /// Scheme name, safe to log
    pub fn scheme(&self) -> &'static str {
        match self {
            Credentials::AccessToken { .. } => "access-token",
            Credentials::ApiKey { .. } => "api-key",
            Credentials::Basic { .. } => "basic",
        }
    }
}

// Secrets stay out of debug output and logs
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            other => f.debug_tuple(other.scheme()).field(&"***").finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headers() {
        assert_eq!(
            Credentials::access_token("abc").header(),
            ("Authorization", "Bearer abc".to_string())
        );
        assert_eq!(
            Credentials::api_key("key").header(),
            (API_KEY_HEADER, "key".to_string())
        );
        // "user:pass"
        assert_eq!(
            Credentials::basic("user", "pass").header(),
            ("Authorization", "Basic dXNlcjpwYXNz".to_string())
        );
    }

    #[test]
    fn test_debug_hides_secrets() {
        let debug = format!("{:?}", Credentials::basic("admin", "hunter2"));
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));

        let debug = format!("{:?}", Credentials::access_token("tok-123"));
        assert!(!debug.contains("tok-123"));
    }
}
