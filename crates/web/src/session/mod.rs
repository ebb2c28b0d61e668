//! Client session: the bearer token and cached user snapshot.
//!
//! [`SessionContext`] owns both entries. API calls read the token through it
//! at call time, and login, profile edits and logout write through it. The
//! authenticated flag is published on a `watch` channel so a view can react
//! to login and logout without polling.
//!
//! The context performs no network calls and never validates the token; a
//! token is good until the server answers 401.

mod storage;

pub use storage::{MemoryStorage, SessionStorage};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, warn};

use myflix_core::{User, Username};

use crate::api::LoginResponse;

/// Storage keys for the session entries.
pub mod keys {
    /// Bearer token returned by login.
    pub const TOKEN: &str = "token";

    /// JSON snapshot of the logged-in user.
    pub const USER: &str = "user";

    /// Every key owned by the session.
    pub const ALL: [&str; 2] = [TOKEN, USER];
}

/// Errors from session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Server-side session record could not be loaded or saved.
    #[error("Session store error: {0}")]
    Store(#[from] tower_sessions::session::Error),

    /// Session file could not be read or written.
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be encoded or decoded.
    #[error("Session data error: {0}")]
    Data(#[from] serde_json::Error),
}

/// The current client session over a storage backend.
pub struct SessionContext<S> {
    storage: S,
    authenticated: watch::Sender<bool>,
}

impl<S: SessionStorage> SessionContext<S> {
    /// Open the session, authenticated if a token is already stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    pub async fn load(storage: S) -> Result<Self, SessionError> {
        let has_token = storage
            .read(keys::TOKEN)
            .await?
            .is_some_and(|token| !token.is_empty());
        let (authenticated, _) = watch::channel(has_token);
        Ok(Self {
            storage,
            authenticated,
        })
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        *self.authenticated.borrow()
    }

    /// Observe the authenticated flag.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.authenticated.subscribe()
    }

    /// The stored bearer token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    pub async fn token(&self) -> Result<Option<SecretString>, SessionError> {
        Ok(self
            .storage
            .read(keys::TOKEN)
            .await?
            .filter(|token| !token.is_empty())
            .map(SecretString::from))
    }

    /// The cached user snapshot.
    ///
    /// A snapshot that no longer decodes is treated as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    pub async fn user(&self) -> Result<Option<User>, SessionError> {
        let Some(raw) = self.storage.read(keys::USER).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Discarding unreadable user snapshot");
                Ok(None)
            }
        }
    }

    /// Username of the cached user.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be read.
    pub async fn username(&self) -> Result<Option<Username>, SessionError> {
        Ok(self.user().await?.map(|user| user.username))
    }

    /// Store a successful login and flip to authenticated.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written; the flag
    /// is left unchanged in that case.
    pub async fn login(&self, login: &LoginResponse) -> Result<(), SessionError> {
        let snapshot = serde_json::to_string(&login.user)?;
        self.storage
            .write(keys::TOKEN, login.token.expose_secret().to_owned())
            .await?;
        self.storage.write(keys::USER, snapshot).await?;
        self.authenticated.send_replace(true);
        debug!(username = %login.user.username, "Session started");
        Ok(())
    }

    /// Replace the cached user snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be written.
    pub async fn update_user(&self, user: &User) -> Result<(), SessionError> {
        let snapshot = serde_json::to_string(user)?;
        self.storage.write(keys::USER, snapshot).await
    }

    /// Clear all session data and flip to unauthenticated.
    ///
    /// The flag flips even when clearing storage fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend cannot be cleared.
    pub async fn logout(&self) -> Result<(), SessionError> {
        let cleared = self.storage.clear().await;
        self.authenticated.send_replace(false);
        debug!("Session cleared");
        cleared
    }
}
