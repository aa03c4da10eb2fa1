//! Token store implementations.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tower_sessions::Session;

use super::keys;
use super::token::ApiToken;

/// Errors that can occur when reading or writing a stored token.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The server-side session could not be read or written.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The token file could not be read or written.
    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Somewhere to keep the API token between requests or runs.
///
/// Absence of a token means logged out.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    fn get_token(&self) -> impl Future<Output = Result<Option<ApiToken>, StoreError>> + Send;

    /// Replace the stored token.
    fn set_token(&self, token: &ApiToken) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Forget the stored token.
    fn clear(&self) -> impl Future<Output = Result<(), StoreError>> + Send;
}

// =============================================================================
// Session
// =============================================================================

/// Token kept in the panel's server-side session under `api_token`.
#[derive(Debug, Clone)]
pub struct SessionTokenStore {
    session: Session,
}

impl SessionTokenStore {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl TokenStore for SessionTokenStore {
    async fn get_token(&self) -> Result<Option<ApiToken>, StoreError> {
        Ok(self.session.get::<ApiToken>(keys::API_TOKEN).await?)
    }

    async fn set_token(&self, token: &ApiToken) -> Result<(), StoreError> {
        self.session.insert(keys::API_TOKEN, token).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.session.remove_value(keys::API_TOKEN).await?;
        Ok(())
    }
}

// =============================================================================
// File
// =============================================================================

/// Token kept in a single file, readable only by its owner on unix.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    async fn get_token(&self) -> Result<Option<ApiToken>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => {
                let token = contents.trim();
                Ok((!token.is_empty()).then(|| ApiToken::new(token)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_token(&self, token: &ApiToken) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&self.path).await?;
        tokio::io::AsyncWriteExt::write_all(&mut file, token.expose_secret().as_bytes()).await?;
        tokio::io::AsyncWriteExt::flush(&mut file).await?;

        // An existing file keeps its old mode on open.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }

        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Memory
// =============================================================================

/// Token kept in memory. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<RwLock<Option<ApiToken>>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `token`.
    #[must_use]
    pub fn with_token(token: ApiToken) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Some(token))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    async fn get_token(&self) -> Result<Option<ApiToken>, StoreError> {
        Ok(self.slot.read().await.clone())
    }

    async fn set_token(&self, token: &ApiToken) -> Result<(), StoreError> {
        *self.slot.write().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.slot.write().await = None;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryTokenStore::new();
        assert!(store.get_token().await.unwrap().is_none());

        store.set_token(&ApiToken::new("abc")).await.unwrap();
        let token = store.get_token().await.unwrap().unwrap();
        assert_eq!(token.expose_secret(), "abc");

        store.clear().await.unwrap();
        assert!(store.get_token().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_slot() {
        let store = MemoryTokenStore::new();
        let other = store.clone();

        store.set_token(&ApiToken::new("shared")).await.unwrap();
        assert_eq!(
            other.get_token().await.unwrap().unwrap().expose_secret(),
            "shared"
        );
    }

    #[tokio::test]
    async fn test_file_store_missing_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("session"));

        assert!(store.get_token().await.unwrap().is_none());
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join(".alamo").join("session"));

        store.set_token(&ApiToken::new("abc")).await.unwrap();
        assert_eq!(
            store.get_token().await.unwrap().unwrap().expose_secret(),
            "abc"
        );
    }

    #[tokio::test]
    async fn test_file_store_blank_file_is_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session");
        tokio::fs::write(&path, "  \n").await.unwrap();

        let store = FileTokenStore::new(path);
        assert!(store.get_token().await.unwrap().is_none());
    }
}
