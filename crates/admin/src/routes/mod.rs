//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (backend reachable)
//!
//! # Session
//! GET  /                       - Login form, or the dashboard once logged in
//! POST /login                  - Exchange credentials for a backend token
//! POST /logout                 - Forget the token
//!
//! # News
//! GET  /news                   - Editor and list of published posts
//! POST /news                   - Editor form (publish, toolbar, remove image, cancel)
//! POST /news/{id}/delete       - Confirm, then delete a post
//! ```

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod news;

use askama::Template;
use axum::{Router, response::Html};

use crate::state::AppState;

/// Build the router for every page.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(dashboard::router())
        .merge(auth::router())
        .merge(news::router())
}

/// Render a template, logging instead of failing on render errors.
fn render(template: &impl Template) -> Html<String> {
    Html(template.render().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Template render failed");
        String::from("Error rendering template")
    }))
}
