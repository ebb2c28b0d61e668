//! Command implementations.
//!
//! Each command drives one view service and prints its notifications, one
//! per line. A command fails with [`CliError::Failed`] when its primary
//! call did not go through; the notifications already say why.

pub mod account;
pub mod catalog;

use std::io::Write;

use thiserror::Error;

use myflix_core::User;
use myflix_web::api::MyflixClient;
use myflix_web::config::ConfigError;
use myflix_web::models::Notifications;
use myflix_web::session::{SessionContext, SessionError};

use crate::storage::FileStorage;

/// Errors that end a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not logged in. Run `myflix login` first.")]
    NotLoggedIn,

    #[error("{0}")]
    Invalid(String),

    /// The primary call failed and was already reported.
    #[error("Command failed")]
    Failed,
}

/// Everything a command needs: API client, session and output.
pub struct Context<W> {
    pub api: MyflixClient,
    pub session: SessionContext<FileStorage>,
    pub out: W,
}

impl<W: Write + Send> Context<W> {
    pub const fn new(api: MyflixClient, session: SessionContext<FileStorage>, out: W) -> Self {
        Self { api, session, out }
    }

    /// Print notifications, oldest first.
    fn report(&mut self, notes: &Notifications) -> Result<(), CliError> {
        for note in notes.iter() {
            writeln!(self.out, "{}", note.message)?;
        }
        Ok(())
    }

    /// The logged-in user's snapshot.
    async fn require_user(&self) -> Result<User, CliError> {
        self.session.user().await?.ok_or(CliError::NotLoggedIn)
    }
}

/// Map a success flag to the command result.
const fn succeeded(ok: bool) -> Result<(), CliError> {
    if ok { Ok(()) } else { Err(CliError::Failed) }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_support {
    use myflix_web::api::MyflixClient;
    use myflix_web::config::ApiConfig;
    use myflix_web::session::SessionContext;
    use serde_json::{Value, json};
    use tempfile::TempDir;
    use wiremock::MockServer;

    use super::Context;
    use crate::storage::FileStorage;

    pub fn user_json(favorites: &[&str]) -> Value {
        json!({
            "_id": "u1",
            "Username": "moviebuff42",
            "Email": "buff@example.com",
            "Birthday": "1990-04-12",
            "FavoriteMovies": favorites
        })
    }

    /// A context with an empty session directory and captured output.
    pub async fn context(server: &MockServer) -> (Context<Vec<u8>>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let api = MyflixClient::new(&ApiConfig::with_base_url(&server.uri()).unwrap()).unwrap();
        let session = SessionContext::load(FileStorage::new(dir.path())).await.unwrap();
        (Context::new(api, session, Vec::new()), dir)
    }

    /// A context already logged in as `moviebuff42`.
    pub async fn logged_in(server: &MockServer, favorites: &[&str]) -> (Context<Vec<u8>>, TempDir) {
        let (ctx, dir) = context(server).await;
        let login = serde_json::from_value(json!({
            "user": user_json(favorites),
            "token": "jwt-token"
        }))
        .unwrap();
        ctx.session.login(&login).await.unwrap();
        (ctx, dir)
    }

    pub fn output(ctx: &Context<Vec<u8>>) -> String {
        String::from_utf8(ctx.out.clone()).unwrap()
    }
}
