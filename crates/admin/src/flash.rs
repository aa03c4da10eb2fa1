//! One-shot notifications carried across a redirect in the session.

use alamo_core::Notification;
use tower_sessions::Session;

use crate::session::{StoreError, keys};

/// Queue a notification for the next rendered page.
///
/// # Errors
///
/// Returns error if the session cannot be read or written.
pub async fn push(session: &Session, notification: Notification) -> Result<(), StoreError> {
    let mut pending: Vec<Notification> = session.get(keys::FLASH).await?.unwrap_or_default();
    pending.push(notification);
    session.insert(keys::FLASH, pending).await?;
    Ok(())
}

/// Remove and return every queued notification, oldest first.
///
/// # Errors
///
/// Returns error if the session cannot be read or written.
pub async fn take(session: &Session) -> Result<Vec<Notification>, StoreError> {
    Ok(session
        .remove::<Vec<Notification>>(keys::FLASH)
        .await?
        .unwrap_or_default())
}
