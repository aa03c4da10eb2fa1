//! Admin authentication: the API token and where it is kept.
//!
//! The [`SessionController`] owns the token for one login slot. Where the
//! token is persisted is decided by the [`TokenStore`] it is given:
//!
//! - [`SessionTokenStore`] - the panel's server-side session (one per browser)
//! - [`FileTokenStore`] - a file on disk (the CLI)
//! - [`MemoryTokenStore`] - process memory (tests)

mod controller;
mod stores;
mod token;

pub use controller::{LoginError, SessionController, View};
pub use stores::{FileTokenStore, MemoryTokenStore, SessionTokenStore, StoreError, TokenStore};
pub use token::ApiToken;

/// Session keys for panel state.
pub mod keys {
    /// Key for the backend API token.
    pub const API_TOKEN: &str = "api_token";

    /// Key for the news draft being composed.
    pub const NEWS_DRAFT: &str = "news_draft";

    /// Key for pending one-shot notifications.
    pub const FLASH: &str = "flash";
}
