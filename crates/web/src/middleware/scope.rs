//! Per-view cancellation.
//!
//! Each handler that calls the API takes a [`ViewScope`]. When axum drops the
//! handler future (the client disconnected) the scope's drop guard fires
//! and every API request issued through [`ViewScope::client`] resolves to
//! [`crate::api::ApiError::Cancelled`] instead of running to completion.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::api::MyflixClient;

/// Cancellation scope of one rendered view.
pub struct ViewScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl ViewScope {
    #[must_use]
    pub fn new() -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    /// An API client whose requests end with this view.
    #[must_use]
    pub fn client(&self, api: &MyflixClient) -> MyflixClient {
        api.with_cancellation(self.token.clone())
    }

    #[must_use]
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FromRequestParts<S> for ViewScope
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dropping_scope_cancels_token() {
        let scope = ViewScope::new();
        let token = scope.token().clone();
        assert!(!token.is_cancelled());

        drop(scope);
        assert!(token.is_cancelled());
    }
}
