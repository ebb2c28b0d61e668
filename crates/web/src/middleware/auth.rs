//! Session extractor.
//!
//! Provides [`CurrentSession`], the per-request handle on the browser's
//! session record and the [`SessionContext`] over it.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::{Notification, Notifications};
use crate::session::SessionContext;

use super::flash::{push_flash, take_flash};

/// The browser's session for this request.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(current: CurrentSession) -> impl IntoResponse {
///     if current.context.is_authenticated() {
///         // ...
///     }
/// }
/// ```
pub struct CurrentSession {
    pub context: SessionContext<Session>,
    record: Session,
}

impl CurrentSession {
    /// Park notifications for the next page render.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be written.
    pub async fn flash(&self, notes: Notifications) -> Result<(), AppError> {
        Ok(push_flash(&self.record, notes).await?)
    }

    /// Take the notifications parked by earlier actions.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be modified.
    pub async fn take_flash(&self) -> Result<Vec<Notification>, AppError> {
        Ok(take_flash(&self.record).await?)
    }

    /// Issue a fresh session ID, used when the user logs in.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be saved.
    pub async fn cycle_id(&self) -> Result<(), AppError> {
        self.record
            .cycle_id()
            .await
            .map_err(crate::session::SessionError::from)?;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let record = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer missing".to_string()))?;

        let context = SessionContext::load(record.clone()).await?;
        Ok(Self { context, record })
    }
}
