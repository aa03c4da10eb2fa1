//! Token authentication endpoint.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{BackendClient, BackendError};
use crate::session::ApiToken;

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

impl BackendClient {
    /// Exchange a username and password for an API token.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Network` if the backend is unreachable, a
    /// rejection if the credentials are refused, or `Decode` if the success
    /// body carries no token.
    pub async fn obtain_token(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<ApiToken, BackendError> {
        let url = self.endpoint("api-token-auth/")?;
        let response = self
            .http()
            .post(url)
            .json(&Credentials {
                username,
                password: password.expose_secret(),
            })
            .send()
            .await?;

        let TokenResponse { token } = Self::handle_response(response).await?;
        if token.is_empty() {
            return Err(BackendError::Decode("empty token in response".to_string()));
        }

        tracing::debug!(username, "Obtained API token");
        Ok(ApiToken::new(token))
    }
}
