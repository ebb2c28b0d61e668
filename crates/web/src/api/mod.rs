//! myFlix REST API client.
//!
//! # Architecture
//!
//! - One method per remote action on [`MyflixClient`]
//! - The client never reads or writes session data: callers pass the bearer
//!   token they got from [`crate::session::SessionContext`] at call time
//! - Failures are mapped by HTTP status to user-facing messages; the mapped
//!   message is what callers see, never the transport error
//! - Every request can be tied to a `CancellationToken` via
//!   [`MyflixClient::with_cancellation`]
//!
//! # Example
//!
//! ```rust,ignore
//! use myflix_web::api::{Credentials, MyflixClient};
//!
//! let client = MyflixClient::new(&config.api)?;
//!
//! // Step 1: authenticate
//! let login = client.login(&Credentials::new("moviebuff42", password)).await?;
//! // Step 2: persist, separately
//! session.login(&login).await?;
//!
//! let movies = client.list_movies(session.token().await?.as_ref()).await?;
//! ```

mod client;
pub mod types;

pub use client::MyflixClient;
pub use types::{Credentials, LoginResponse, ProfileUpdate, Registration};

use reqwest::StatusCode;
use thiserror::Error;

/// Errors surfaced by API operations.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 400: the server rejected the request payload.
    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// 401: missing, invalid or expired token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 404: unknown user, movie, genre or director.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Any other status, a transport failure, or an undecodable body.
    #[error("Something bad happened; please try again later.")]
    Unavailable,

    /// The view that issued the request went away.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Map a non-success HTTP status and its body to an error.
    #[must_use]
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest(describe_body(body)),
            StatusCode::UNAUTHORIZED => Self::Unauthorized(describe_body(body)),
            StatusCode::NOT_FOUND => Self::NotFound(describe_body(body)),
            _ => Self::Unavailable,
        }
    }

    /// Returns `true` if the request was cancelled rather than failed.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors surfaced by [`MyflixClient::login`].
///
/// Login has its own wording: a 401 means bad credentials, anything else is
/// reported generically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("An error occurred during login. Please try again.")]
    Failed,

    #[error("Request cancelled")]
    Cancelled,
}

impl From<ApiError> for LoginError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized(_) => Self::InvalidCredentials,
            ApiError::Cancelled => Self::Cancelled,
            _ => Self::Failed,
        }
    }
}

/// Render an error body the way the message should quote it.
///
/// JSON bodies are re-serialized compactly, plain text becomes a quoted JSON
/// string, and an empty body reads `null`.
fn describe_body(body: &str) -> String {
    if body.trim().is_empty() {
        return "null".to_string();
    }
    serde_json::from_str::<serde_json::Value>(body).map_or_else(
        |_| serde_json::Value::String(body.to_owned()).to_string(),
        |value| value.to_string(),
    )
}
