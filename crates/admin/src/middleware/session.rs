//! Session middleware configuration for admin.
//!
//! Sessions live in process memory: they hold only the backend token, the
//! draft being edited and pending notifications, all of which are cheap to
//! lose on restart. The moka cache drops a session once its expiry date
//! passes and evicts the least used ones past `max_sessions`.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "alamo_admin_session";

/// Session expiry time in seconds (24 hours of inactivity).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// In-memory session store bounded by `config.max_sessions`.
#[must_use]
pub fn create_session_store(config: &AdminConfig) -> MokaStore {
    MokaStore::new(Some(config.max_sessions))
}

/// Create the session layer over a bounded in-memory store.
#[must_use]
pub fn create_session_layer(config: &AdminConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store(config))
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
