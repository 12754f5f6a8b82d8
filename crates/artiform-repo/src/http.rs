//! HTTP implementation of the repository service
//!
//! Speaks the server's repository configuration REST API:
//!
//! | operation | request |
//! |---|---|
//! | create | `PUT {base}/api/repositories/{key}` |
//! | read | `GET {base}/api/repositories/{key}` |
//! | update | `POST {base}/api/repositories/{key}` |
//! | delete | `DELETE {base}/api/repositories/{key}` |
//! | exists | `HEAD {base}/api/repositories/{key}` |

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Duration;
use url::Url;

use crate::config::ProviderConfig;
use crate::credentials::Credentials;
use crate::error::{RepoError, Result};
use crate::schema::is_valid_repo_key;
use crate::service::RepositoryService;

/// Error body the server sends on failures
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: String,
}

/// Repository service backed by the server's REST API
pub struct HttpRepositoryService {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    timeout_secs: u64,
}

impl HttpRepositoryService {
    /// Build a client from provider configuration
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let base_url = config.base_url()?;
        let credentials = config.credentials()?;

        let client = reqwest::Client::builder()
            // a redirect would re-send the credentials to wherever it points
            .redirect(reqwest::redirect::Policy::none())
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("artiform/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RepoError::NetworkError {
                message: e.to_string(),
            })?;

        tracing::debug!(
            url = %base_url,
            auth = credentials.as_ref().map(Credentials::scheme).unwrap_or("none"),
            "configured repository service"
        );

        Ok(Self {
            client,
            base_url,
            credentials,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/api/repositories/{key}`
    pub fn repository_url(&self, key: &str) -> Result<Url> {
        if !is_valid_repo_key(key) {
            return Err(RepoError::InvalidKey {
                key: key.to_string(),
            });
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RepoError::InvalidServerUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be a base".to_string(),
            })?
            .pop_if_empty()
            .extend(["api", "repositories", key]);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self.client.request(method, url);
        match &self.credentials {
            Some(creds) => {
                let (name, value) = creds.header();
                request.header(name, value)
            }
            None => request,
        }
    }

    async fn send(&self, key: &str, method: Method, body: Option<&JsonValue>) -> Result<Response> {
        let url = self.repository_url(key)?;
        tracing::debug!(%method, %url, "repository request");

        let mut request = self.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        self.check_status(key, &url, response).await
    }

    fn transport_error(&self, e: reqwest::Error) -> RepoError {
        if e.is_timeout() {
            RepoError::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            RepoError::from(e)
        }
    }

    async fn check_status(&self, key: &str, url: &Url, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        match status {
            StatusCode::NOT_FOUND => Err(RepoError::NotFound {
                key: key.to_string(),
            }),
            StatusCode::UNAUTHORIZED => Err(RepoError::AuthRequired {
                url: url.to_string(),
            }),
            StatusCode::FORBIDDEN => Err(RepoError::AuthFailed {
                message: format!("Access denied to {}", url),
            }),
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after = response
                    .headers()
                    .get("Retry-After")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(60);
                Err(RepoError::RateLimited { retry_after })
            }
            _ => {
                let text = response.text().await.unwrap_or_default();
                Err(RepoError::Remote {
                    status: status.as_u16(),
                    message: server_message(status, &text),
                })
            }
        }
    }
}

/// The server's own diagnostic, unmodified
fn server_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        let messages: Vec<&str> = parsed
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
            .collect();
        if !messages.is_empty() {
            return messages.join("; ");
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl RepositoryService for HttpRepositoryService {
    async fn create_repository(&self, key: &str, body: &JsonValue) -> Result<()> {
        self.send(key, Method::PUT, Some(body)).await?;
        Ok(())
    }

    async fn get_repository(&self, key: &str) -> Result<JsonValue> {
        let response = self.send(key, Method::GET, None).await?;
        response.json().await.map_err(|e| RepoError::Serialization(e.to_string()))
    }

    async fn update_repository(&self, key: &str, body: &JsonValue) -> Result<()> {
        self.send(key, Method::POST, Some(body)).await?;
        Ok(())
    }

    async fn delete_repository(&self, key: &str) -> Result<()> {
        self.send(key, Method::DELETE, None).await?;
        Ok(())
    }

    async fn repository_exists(&self, key: &str) -> Result<bool> {
        match self.send(key, Method::HEAD, None).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
