//! Álamo Admin library.
//!
//! Administration panel for the U.E.N José Ángel Álamo school website. The
//! panel sits in front of the school's REST backend: it exchanges admin
//! credentials for a backend token and uses that token to publish and delete
//! news posts.
//!
//! # Modules
//!
//! - [`backend`] - HTTP client for the school REST backend
//! - [`session`] - API token, token stores and the session controller
//! - [`news`] - News editor and its request cancellation scope
//! - [`routes`] - Server-rendered pages
//!
//! The CLI reuses [`backend`], [`session`] and [`news`] with a file-backed
//! token store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod filters;
pub mod flash;
pub mod middleware;
pub mod news;
pub mod routes;
pub mod session;
pub mod state;

use axum::{Router, extract::DefaultBodyLimit};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use middleware::{create_session_layer, request_id_middleware, security_headers_middleware};
use state::AppState;

/// Stylesheet and editor script, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/admin/static";

/// Build the full application: routes, static files and the middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());
    let body_limit = state.config().max_upload_bytes;

    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
