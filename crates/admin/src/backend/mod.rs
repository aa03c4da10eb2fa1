//! HTTP client for the school REST backend.
//!
//! Every endpoint is resolved relative to the configured `API_URL`, so a
//! backend mounted under a path prefix works the same as one at the root.
//!
//! # Endpoints
//!
//! - `POST /api-token-auth/` - exchange credentials for a token
//! - `GET /api/categorias/` - list categories (public)
//! - `GET /api/noticias/` - list posts (public)
//! - `POST /api/noticias/` - create a post (multipart, `Authorization: Token <t>`)
//! - `DELETE /api/noticias/{id}/` - delete a post (`Authorization: Token <t>`)

mod auth;
mod news;

use std::sync::Arc;

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

use crate::config::BackendConfig;
use crate::session::ApiToken;

/// Longest error body kept in `BackendError::Rejected`.
const MAX_ERROR_BODY_CHARS: usize = 300;

/// Errors that can occur when talking to the school backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request never got a response (DNS, refused connection, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend rejected the request: {status} - {message}")]
    Rejected { status: u16, message: String },

    /// The token was missing, expired or invalid.
    #[error("Unauthorized: token rejected by backend")]
    Unauthorized,

    /// A success response whose body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// An endpoint path could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl BackendError {
    /// True when the backend was reached and answered with an error status.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::Unauthorized)
    }
}

/// Client for the school REST backend.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a new backend client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("alamo-admin/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(BackendClientInner {
                client,
                base_url: normalize_base(config.api_url.clone()),
            }),
        })
    }

    /// Base URL every endpoint is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path relative to the base URL.
    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        Ok(self.inner.base_url.join(path.trim_start_matches('/'))?)
    }

    fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Execute an unauthenticated GET and parse the JSON body.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, BackendError> {
        let url = self.endpoint(path)?;
        let response = self.http().get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Execute an authenticated DELETE, accepting any 2xx status.
    async fn delete(&self, path: &str, token: &ApiToken) -> Result<(), BackendError> {
        let url = self.endpoint(path)?;
        let response = self
            .http()
            .delete(url)
            .header(reqwest::header::AUTHORIZATION, token.authorization())
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }

        Err(Self::parse_error(response).await)
    }

    /// Handle a response and parse its JSON body.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        if response.status().is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body)
                .map_err(|e| BackendError::Decode(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Turn a non-success response into a `BackendError`.
    async fn parse_error(response: reqwest::Response) -> BackendError {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return BackendError::Unauthorized;
        }

        let body = response.text().await.unwrap_or_default();
        let message = if body.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        } else {
            body.trim().chars().take(MAX_ERROR_BODY_CHARS).collect()
        };

        BackendError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

/// Make sure the base path ends in `/` so relative joins keep any prefix.
fn normalize_base(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
