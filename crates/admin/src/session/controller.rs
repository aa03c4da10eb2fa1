//! Login, logout and the login-or-shell render decision.

use secrecy::SecretString;
use thiserror::Error;

use super::stores::{StoreError, TokenStore};
use super::token::ApiToken;
use crate::backend::{BackendClient, BackendError};

/// Login failures, displayed to the admin as-is.
#[derive(Debug, Error)]
pub enum LoginError {
    /// The backend answered but refused the credentials.
    #[error("Credenciales incorrectas. Verifique usuario y contraseña.")]
    IncorrectCredentials,

    /// The backend could not be reached or answered nonsense.
    #[error("Error de conexión con el servidor.")]
    Connection(#[source] BackendError),

    /// The token was issued but could not be stored.
    #[error("No se pudo guardar la sesión.")]
    Store(#[from] StoreError),
}

impl From<BackendError> for LoginError {
    fn from(err: BackendError) -> Self {
        if err.is_rejection() {
            Self::IncorrectCredentials
        } else {
            Self::Connection(err)
        }
    }
}

/// What to render for the current session.
#[derive(Debug, Clone)]
pub enum View {
    /// No token: show the login form.
    LoginForm,
    /// Authenticated: show the panel shell with this credential.
    Shell(ApiToken),
}

impl View {
    #[must_use]
    pub const fn is_login_form(&self) -> bool {
        matches!(self, Self::LoginForm)
    }
}

/// Owns the admin token for one token store.
pub struct SessionController<S> {
    backend: BackendClient,
    store: S,
    token: Option<ApiToken>,
}

impl<S: TokenStore> SessionController<S> {
    /// A logged-out controller. Call [`restore`](Self::restore) to pick up a stored token.
    #[must_use]
    pub const fn new(backend: BackendClient, store: S) -> Self {
        Self {
            backend,
            store,
            token: None,
        }
    }

    /// Load a previously stored token without checking it against the backend.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be read.
    pub async fn restore(&mut self) -> Result<View, StoreError> {
        self.token = self.store.get_token().await?;
        Ok(self.view())
    }

    /// Exchange credentials for a token and persist it.
    ///
    /// Not retried on failure.
    ///
    /// # Errors
    ///
    /// Returns `IncorrectCredentials` when the backend refuses, `Connection`
    /// when it cannot be reached, `Store` when the token cannot be saved.
    pub async fn login(
        &mut self,
        username: &str,
        password: &SecretString,
    ) -> Result<ApiToken, LoginError> {
        let token = match self.backend.obtain_token(username, password).await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(username, error = %err, "Login failed");
                return Err(err.into());
            }
        };

        self.store.set_token(&token).await?;
        self.token = Some(token.clone());
        tracing::info!(username, "Admin logged in");
        Ok(token)
    }

    /// Forget the token. The in-memory state is cleared even if the store fails.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be cleared.
    pub async fn logout(&mut self) -> Result<(), StoreError> {
        self.token = None;
        self.store.clear().await?;
        tracing::info!("Admin logged out");
        Ok(())
    }

    #[must_use]
    pub fn view(&self) -> View {
        self.token
            .as_ref()
            .map_or(View::LoginForm, |token| View::Shell(token.clone()))
    }

    #[must_use]
    pub const fn token(&self) -> Option<&ApiToken> {
        self.token.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn backend(&self) -> &BackendClient {
        &self.backend
    }
}
