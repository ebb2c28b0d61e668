//! HTTP route handlers for the myFlix front-end.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                                 - Redirect to /movies or /welcome
//! GET  /health                           - Health check
//!
//! # Welcome
//! GET  /welcome                          - Register and login forms
//! POST /welcome/register                 - Register action
//! POST /welcome/login                    - Login action
//! POST /logout                           - Logout action
//!
//! # Catalog
//! GET  /movies                           - Movie list with favorite toggles
//! POST /movies/{id}/favorite             - Toggle favorite
//! GET  /movies/{title}/synopsis          - Synopsis detail
//! GET  /genres/{name}                    - Genre detail
//! GET  /directors/{name}                 - Director detail
//!
//! # Profile
//! GET  /profile                          - Profile and favorites
//! POST /profile/favorites/{id}/remove    - Remove favorite
//! POST /profile/delete                   - Delete account (confirm=yes)
//! GET  /profile/edit                     - Edit form
//! POST /profile/edit                     - Save profile
//! ```
//!
//! Actions answer with a redirect and park their notifications in the
//! session; the next page render shows them as toasts.

pub mod movies;
pub mod profile;
pub mod welcome;

use axum::{
    Router,
    extract::Request,
    http::Uri,
    middleware::from_fn,
    response::Redirect,
    routing::{get, post},
};
use chrono::NaiveDate;
use tower_http::{services::ServeDir, trace::TraceLayer};
use url::Url;

use myflix_core::parse_birthday;

use crate::error::AppError;
use crate::middleware::{CurrentSession, create_session_layer, request_id_middleware};
use crate::models::{Navigation, Notification, Notifications, Route};
use crate::state::AppState;

/// Directory served under `/static`.
const STATIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/static");

/// Context every page template renders from.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub authenticated: bool,
    pub username: Option<String>,
    /// Toasts to show, oldest first.
    pub notifications: Vec<Notification>,
}

impl Page {
    /// Collect parked notifications plus the ones raised while rendering.
    ///
    /// # Errors
    ///
    /// Returns an error if the session record cannot be read.
    pub async fn load(current: &CurrentSession, notes: Notifications) -> Result<Self, AppError> {
        let mut notifications = current.take_flash().await?;
        notifications.extend(notes);
        Ok(Self {
            authenticated: current.context.is_authenticated(),
            username: current
                .context
                .username()
                .await?
                .map(|username| username.to_string()),
            notifications,
        })
    }
}

/// Park notifications and redirect to wherever the action leads.
async fn finish(
    current: &CurrentSession,
    notes: Notifications,
    next: Navigation,
    fallback: Route,
) -> Result<Redirect, AppError> {
    current.flash(notes).await?;
    Ok(Redirect::to(next.route().unwrap_or(fallback).path()))
}

/// Parse the optional birthday field of a form.
fn parse_form_birthday(raw: &str) -> Result<Option<NaiveDate>, String> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_birthday(raw)
        .map(Some)
        .map_err(|_| "Invalid birthday: use YYYY-MM-DD".to_string())
}

/// Build a path from raw segments, percent-encoding each one.
#[must_use]
pub fn segment_path(segments: &[&str]) -> String {
    let Ok(mut url) = Url::parse("http://localhost/") else {
        return "/".to_string();
    };
    if let Ok(mut path) = url.path_segments_mut() {
        path.clear().extend(segments);
    }
    url.path().to_string()
}

/// Send visitors to the movie list when logged in, otherwise to welcome.
async fn index(current: CurrentSession) -> Redirect {
    if current.context.is_authenticated() {
        Redirect::to(Route::Movies.path())
    } else {
        Redirect::to(Route::Welcome.path())
    }
}

/// Answer unknown paths with a plain 404.
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Create the welcome routes router.
pub fn welcome_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(welcome::show))
        .route("/register", post(welcome::register))
        .route("/login", post(welcome::login))
}

/// Create the movie routes router.
pub fn movie_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(movies::index))
        // Captures at the same position must share a name.
        .route("/{movie}/favorite", post(movies::toggle_favorite))
        .route("/{movie}/synopsis", get(movies::synopsis))
}

/// Create the profile routes router.
pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(profile::show))
        .route("/favorites/{id}/remove", post(profile::remove_favorite))
        .route("/delete", post(profile::delete_account))
        .route("/edit", get(profile::edit_form).post(profile::edit))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .nest("/welcome", welcome_routes())
        .route("/logout", post(welcome::logout))
        .nest("/movies", movie_routes())
        .route("/genres/{name}", get(movies::genre))
        .route("/directors/{name}", get(movies::director))
        .nest("/profile", profile_routes())
}

/// The complete application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .fallback(not_found)
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = tracing::field::Empty,
            )
        }))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{ApiConfig, MyflixConfig};

    fn test_state() -> AppState {
        AppState::new(MyflixConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            api: ApiConfig::with_base_url("http://127.0.0.1:9").unwrap(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        })
        .unwrap()
    }

    #[test]
    fn test_segment_path_encodes_each_segment() {
        assert_eq!(
            segment_path(&["movies", "The Dark Knight", "synopsis"]),
            "/movies/The%20Dark%20Knight/synopsis"
        );
        assert_eq!(segment_path(&["genres", "Sci/Fi"]), "/genres/Sci%2FFi");
    }

    #[test]
    fn test_parse_form_birthday() {
        assert_eq!(parse_form_birthday("  ").unwrap(), None);
        assert_eq!(
            parse_form_birthday("1990-04-12").unwrap(),
            NaiveDate::from_ymd_opt(1990, 4, 12)
        );
        assert!(parse_form_birthday("12/04/1990").is_err());
    }

    #[tokio::test]
    async fn test_root_redirects_anonymous_to_welcome() {
        let response = app(test_state())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/welcome");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = app(test_state())
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(test_state())
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }
}
