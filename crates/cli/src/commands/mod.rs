//! Command implementations.
//!
//! Every command works against the same saved token file, so the CLI and a
//! shell script can log in once and run several commands.

pub mod news;
pub mod session;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use alamo_admin::backend::{BackendClient, BackendError};
use alamo_admin::config::{BackendConfig, ConfigError};
use alamo_admin::news::EditorError;
use alamo_admin::session::{ApiToken, FileTokenStore, LoginError, StoreError, TokenStore};
use alamo_core::ImageError;
use secrecy::SecretString;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// No backend URL was given.
    #[error("Missing backend URL: pass --api-url or set API_URL")]
    MissingApiUrl,

    /// The backend URL is not usable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The command needs a token and none is saved.
    #[error("Not logged in: run `alamo login` first")]
    NotLoggedIn,

    #[error("Either --content or --content-file is required")]
    MissingContent,

    /// Backend call failed.
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Login(#[from] LoginError),

    #[error(transparent)]
    Editor(#[from] EditorError),

    /// Token file could not be read or written.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The cover image was rejected.
    #[error("Invalid image {path}: {source}")]
    Image { path: PathBuf, source: ImageError },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where to reach the backend and where the token lives.
pub struct Context {
    api_url: Option<String>,
    store: FileTokenStore,
}

impl Context {
    pub fn new(api_url: Option<String>, session_file: PathBuf) -> Self {
        Self {
            api_url,
            store: FileTokenStore::new(session_file),
        }
    }

    pub const fn store(&self) -> &FileTokenStore {
        &self.store
    }

    /// Client for the configured backend.
    pub fn backend(&self) -> Result<BackendClient, CliError> {
        let api_url = self.api_url.as_deref().ok_or(CliError::MissingApiUrl)?;
        let config = BackendConfig::new(api_url)?;
        Ok(BackendClient::new(&config)?)
    }

    /// The saved token, required for mutating commands.
    pub async fn token(&self) -> Result<ApiToken, CliError> {
        self.store.get_token().await?.ok_or(CliError::NotLoggedIn)
    }
}

/// Ask a yes/no question on the terminal. Anything but yes is a no.
pub fn confirm(question: &str) -> bool {
    prompt(&format!("{question} [s/N] "))
        .map(|answer| is_yes(&answer))
        .unwrap_or(false)
}

/// Print `message` to stderr and read one line from stdin.
#[allow(clippy::print_stderr)]
pub fn prompt(message: &str) -> Result<String, CliError> {
    eprint!("{message}");
    std::io::stderr().flush()?;

    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Read a password from the terminal without echoing it.
pub fn prompt_password(message: &str) -> Result<SecretString, CliError> {
    Ok(SecretString::from(rpassword::prompt_password(message)?))
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}
