//! Authentication extractors for admin.
//!
//! The token lives in the server-side session; these extractors restore a
//! [`SessionController`] from it for each request.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::error::AppError;
use crate::session::{ApiToken, SessionController, SessionTokenStore, View};
use crate::state::AppState;

/// The request's session with its controller already restored.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(AdminSession { controller, .. }: AdminSession) -> impl IntoResponse {
///     if controller.is_authenticated() { "shell" } else { "login" }
/// }
/// ```
pub struct AdminSession {
    pub controller: SessionController<SessionTokenStore>,
    pub session: Session,
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer not installed".to_string()))?;

        let mut controller = SessionController::new(
            state.backend().clone(),
            SessionTokenStore::new(session.clone()),
        );
        controller.restore().await?;

        Ok(Self {
            controller,
            session,
        })
    }
}

/// Extractor that requires a stored API token.
///
/// Without one the admin is sent back to the login form at `/`.
pub struct RequireToken(pub ApiToken);

/// Error returned when a token is required but the admin is not logged in.
pub enum TokenRejection {
    /// Redirect to the login form.
    RedirectToLogin,
    /// The session could not be read.
    Failed(AppError),
}

impl IntoResponse for TokenRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/").into_response(),
            Self::Failed(err) => err.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireToken {
    type Rejection = TokenRejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AdminSession { controller, .. } = AdminSession::from_request_parts(parts, state)
            .await
            .map_err(TokenRejection::Failed)?;

        match controller.view() {
            View::Shell(token) => Ok(Self(token)),
            View::LoginForm => Err(TokenRejection::RedirectToLogin),
        }
    }
}
