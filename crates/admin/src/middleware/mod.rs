//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (strict CSP for admin)
//! 5. Session layer (tower-sessions with in-memory store)
//! 6. Auth extractors (per handler, redirect to the login form)

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{AdminSession, RequireToken};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
