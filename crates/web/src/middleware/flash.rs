//! Flash notifications.
//!
//! Actions end in a redirect, so their notifications are parked in the
//! session and shown by the next page render.

use tower_sessions::Session;

use crate::models::{Notification, Notifications};
use crate::session::SessionError;

/// Session key for pending notifications.
const FLASH_KEY: &str = "flash";

/// Append notifications to the pending queue.
///
/// # Errors
///
/// Returns an error if the session record cannot be read or written.
pub async fn push_flash(session: &Session, notes: Notifications) -> Result<(), SessionError> {
    if notes.is_empty() {
        return Ok(());
    }
    let mut pending: Vec<Notification> = session.get(FLASH_KEY).await?.unwrap_or_default();
    pending.extend(notes);
    session.insert(FLASH_KEY, pending).await?;
    Ok(())
}

/// Remove and return every pending notification.
///
/// # Errors
///
/// Returns an error if the session record cannot be modified.
pub async fn take_flash(session: &Session) -> Result<Vec<Notification>, SessionError> {
    Ok(session
        .remove::<Vec<Notification>>(FLASH_KEY)
        .await?
        .unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use super::*;

    #[tokio::test]
    async fn test_flash_is_taken_once() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);

        let mut notes = Notifications::new();
        notes.notify("User logged in successfully!");
        push_flash(&session, notes).await.unwrap();

        let mut more = Notifications::new();
        more.push(Notification::new("Something went wrong.").with_duration(3000));
        push_flash(&session, more).await.unwrap();

        let taken = take_flash(&session).await.unwrap();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].message, "User logged in successfully!");
        assert_eq!(taken[1].duration_ms, 3000);

        assert!(take_flash(&session).await.unwrap().is_empty());
    }
}
