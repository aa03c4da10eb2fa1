//! Authentication route handlers for admin.
//!
//! Credentials are checked by the school backend; the panel only keeps the
//! token it hands back.

use askama::Template;
use axum::{
    Form, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::post,
};
use secrecy::SecretString;
use serde::Deserialize;

use super::render;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::AdminSession;
use crate::session::{LoginError, StoreError};
use crate::state::AppState;

/// Login page template.
#[derive(Template)]
#[template(path = "auth/login.html")]
struct LoginTemplate {
    error: Option<String>,
    username: String,
    public_site_url: String,
}

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

/// Login form submission. No `Debug` so the password never reaches a log.
#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

/// Render the login form, optionally with an inline error.
pub(super) fn login_page(state: &AppState, error: Option<String>, username: String) -> Html<String> {
    render(&LoginTemplate {
        error,
        username,
        public_site_url: state.config().public_site_url.clone(),
    })
}

/// Exchange credentials for a token.
///
/// POST /login
async fn login(
    State(state): State<AppState>,
    AdminSession {
        mut controller,
        session,
    }: AdminSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim().to_string();
    let password = SecretString::from(form.password);

    match controller.login(&username, &password).await {
        Ok(_) => {
            // New session id once authenticated
            session.cycle_id().await.map_err(StoreError::from)?;
            set_sentry_user(&username);
            Ok(Redirect::to("/").into_response())
        }
        Err(LoginError::Store(err)) => Err(err.into()),
        Err(err) => {
            let status = match err {
                LoginError::IncorrectCredentials => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            };
            Ok((status, login_page(&state, Some(err.to_string()), username)).into_response())
        }
    }
}

/// Logout and clear the session.
///
/// POST /logout
async fn logout(
    AdminSession {
        mut controller,
        session,
    }: AdminSession,
) -> Result<Redirect, AppError> {
    controller.logout().await?;
    session.flush().await.map_err(StoreError::from)?;
    clear_sentry_user();

    Ok(Redirect::to("/"))
}
