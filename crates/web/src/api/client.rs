//! HTTP client for the myFlix REST API.

use std::sync::Arc;

use reqwest::{Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use myflix_core::{Director, Genre, Movie, MovieId, User, Username};

use super::types::{Credentials, LoginResponse, ProfileUpdate, Registration};
use super::{ApiError, LoginError};
use crate::config::ApiConfig;

/// Client for the myFlix REST API.
///
/// Cheap to clone; clones share one connection pool. Handles returned by
/// [`with_cancellation`](Self::with_cancellation) share it too.
#[derive(Clone)]
pub struct MyflixClient {
    inner: Arc<MyflixClientInner>,
    cancel: Option<CancellationToken>,
}

struct MyflixClientInner {
    http: reqwest::Client,
    base_url: Url,
}

impl MyflixClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("myflix/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(MyflixClientInner {
                http,
                base_url: config.base_url.clone(),
            }),
            cancel: None,
        })
    }

    /// Returns a handle whose requests are abandoned once `token` is cancelled.
    ///
    /// A cancelled request resolves to [`ApiError::Cancelled`].
    #[must_use]
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            cancel: Some(token),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accounts
    // ─────────────────────────────────────────────────────────────────────────

    /// Create an account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`] (usually `BadRequest` for a taken
    /// username or a failed server-side validation).
    #[instrument(skip_all, fields(username = %registration.username))]
    pub async fn register(&self, registration: &Registration) -> Result<User, ApiError> {
        let request = self.request(Method::POST, &["users"]).json(registration);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// Authenticate and return the token and user.
    ///
    /// Nothing is stored; the caller persists the result through
    /// [`crate::session::SessionContext::login`].
    ///
    /// # Errors
    ///
    /// Returns [`LoginError::InvalidCredentials`] on a 401 and
    /// [`LoginError::Failed`] for anything else.
    #[instrument(skip_all, fields(username = %credentials.username))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, LoginError> {
        let request = self.request(Method::POST, &["login"]).json(credentials);
        let body = self.execute(request).await?;
        let response: LoginResponse = decode(&body)?;
        debug!(username = %response.user.username, "Login accepted");
        Ok(response)
    }

    /// Fetch an account.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`]; `NotFound` for an unknown user.
    #[instrument(skip_all, fields(username = %username))]
    pub async fn get_user(
        &self,
        username: &Username,
        token: Option<&SecretString>,
    ) -> Result<User, ApiError> {
        let request = self.authorized(Method::GET, &["users", username.as_str()], token);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// Update an account and return the stored result.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`].
    #[instrument(skip_all, fields(username = %username))]
    pub async fn edit_user(
        &self,
        username: &Username,
        update: &ProfileUpdate,
        token: Option<&SecretString>,
    ) -> Result<User, ApiError> {
        let request = self
            .authorized(Method::PUT, &["users", username.as_str()], token)
            .json(update);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// Delete an account. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`].
    #[instrument(skip_all, fields(username = %username))]
    pub async fn delete_user(
        &self,
        username: &Username,
        token: Option<&SecretString>,
    ) -> Result<(), ApiError> {
        let request = self.authorized(Method::DELETE, &["users", username.as_str()], token);
        self.execute(request).await?;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Catalog
    // ─────────────────────────────────────────────────────────────────────────

    /// List every movie in the catalog.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`].
    #[instrument(skip_all)]
    pub async fn list_movies(&self, token: Option<&SecretString>) -> Result<Vec<Movie>, ApiError> {
        let request = self.authorized(Method::GET, &["movies"], token);
        let body = self.execute(request).await?;
        let movies: Vec<Movie> = decode(&body)?;
        debug!(count = movies.len(), "Fetched movies");
        Ok(movies)
    }

    /// Fetch one movie by title.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`].
    #[instrument(skip_all, fields(title = %title))]
    pub async fn get_movie(
        &self,
        title: &str,
        token: Option<&SecretString>,
    ) -> Result<Movie, ApiError> {
        let request = self.authorized(Method::GET, &["movies", title], token);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// Fetch a genre by name.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`].
    #[instrument(skip_all, fields(name = %name))]
    pub async fn get_genre(
        &self,
        name: &str,
        token: Option<&SecretString>,
    ) -> Result<Genre, ApiError> {
        let request = self.authorized(Method::GET, &["genres", name], token);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// Fetch a director by name.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`].
    #[instrument(skip_all, fields(name = %name))]
    pub async fn get_director(
        &self,
        name: &str,
        token: Option<&SecretString>,
    ) -> Result<Director, ApiError> {
        let request = self.authorized(Method::GET, &["directors", name], token);
        let body = self.execute(request).await?;
        decode(&body)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Favorites
    // ─────────────────────────────────────────────────────────────────────────

    /// List a user's favorite movies as full movie records.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`].
    #[instrument(skip_all, fields(username = %username))]
    pub async fn list_favorites(
        &self,
        username: &Username,
        token: Option<&SecretString>,
    ) -> Result<Vec<Movie>, ApiError> {
        let request = self.authorized(Method::GET, &["users", username.as_str(), "movies"], token);
        let body = self.execute(request).await?;
        decode(&body)
    }

    /// Add a movie to a user's favorites.
    ///
    /// Returns the server's copy of the user when the response body is one.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`].
    #[instrument(skip_all, fields(username = %username, movie_id = %movie_id))]
    pub async fn add_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
        token: Option<&SecretString>,
    ) -> Result<Option<User>, ApiError> {
        let request = self.authorized(
            Method::POST,
            &["users", username.as_str(), "movies", movie_id.as_str()],
            token,
        );
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body).ok())
    }

    /// Remove a movie from a user's favorites.
    ///
    /// Returns the server's copy of the user when the response body is one.
    ///
    /// # Errors
    ///
    /// Returns the mapped [`ApiError`].
    #[instrument(skip_all, fields(username = %username, movie_id = %movie_id))]
    pub async fn remove_favorite(
        &self,
        username: &Username,
        movie_id: &MovieId,
        token: Option<&SecretString>,
    ) -> Result<Option<User>, ApiError> {
        let request = self.authorized(
            Method::DELETE,
            &["users", username.as_str(), "movies", movie_id.as_str()],
            token,
        );
        let body = self.execute(request).await?;
        Ok(serde_json::from_str(&body).ok())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Request plumbing
    // ─────────────────────────────────────────────────────────────────────────

    /// Resolve path segments under the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.inner.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        self.inner.http.request(method, self.endpoint(segments))
    }

    /// Build a request carrying the bearer token, if there is one.
    fn authorized(
        &self,
        method: Method,
        segments: &[&str],
        token: Option<&SecretString>,
    ) -> RequestBuilder {
        let request = self.request(method, segments);
        match token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => {
                warn!("No session token; sending request without Authorization header");
                request
            }
        }
    }

    /// Send a request and return the body of a successful response.
    async fn execute(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let send = async {
            let response = request.send().await.map_err(|e| {
                warn!(error = %e, "myFlix API request failed");
                ApiError::Unavailable
            })?;

            let status = response.status();
            let body = response.text().await.map_err(|e| {
                warn!(error = %e, %status, "Failed to read myFlix API response");
                ApiError::Unavailable
            })?;

            if status.is_success() {
                Ok(body)
            } else {
                warn!(%status, body = %body, "myFlix API returned an error");
                Err(ApiError::from_status(status, &body))
            }
        };

        match &self.cancel {
            Some(cancel) => tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("myFlix API request cancelled");
                    Err(ApiError::Cancelled)
                }
                result = send => result,
            },
            None => send.await,
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| {
        warn!(error = %e, "Failed to decode myFlix API response");
        ApiError::Unavailable
    })
}
