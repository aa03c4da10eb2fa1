//! Login, logout and status.
//!
//! # Environment Variables
//!
//! - `API_URL` - Base URL of the school backend
//! - `ALAMO_PASSWORD` - Password for `login`, instead of the prompt
//! - `ALAMO_SESSION_FILE` - Token file (default `.alamo/session`)

use alamo_admin::session::{SessionController, TokenStore};
use secrecy::SecretString;

use super::{CliError, Context, prompt_password};

/// Log in and save the token.
///
/// # Errors
///
/// Returns `CliError::Login` with the panel's message when the backend
/// refuses the credentials or cannot be reached.
pub async fn login(ctx: &Context, username: &str, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => SecretString::from(password),
        None => prompt_password("Contraseña: ")?,
    };

    let mut controller = SessionController::new(ctx.backend()?, ctx.store().clone());
    controller.login(username.trim(), &password).await?;

    tracing::info!(
        username = %username.trim(),
        path = %ctx.store().path().display(),
        "Logged in, token saved"
    );
    Ok(())
}

/// Forget the saved token. Does not contact the backend.
///
/// # Errors
///
/// Returns error if the token file exists but cannot be removed.
pub async fn logout(ctx: &Context) -> Result<(), CliError> {
    ctx.store().clear().await?;
    tracing::info!("Logged out");
    Ok(())
}

/// Report whether a token is saved.
///
/// # Errors
///
/// Returns error if the token file cannot be read.
#[allow(clippy::print_stdout)]
pub async fn status(ctx: &Context) -> Result<(), CliError> {
    let path = ctx.store().path().display();
    if ctx.store().get_token().await?.is_some() {
        println!("Sesión activa ({path})");
    } else {
        println!("Sin sesión");
    }
    Ok(())
}
