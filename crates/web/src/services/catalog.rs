//! Movie list, favorites and detail views.

use tracing::{debug, instrument};

use myflix_core::{Director, Favorites, Genre, Movie, MovieId, User};

use crate::api::{ApiError, MyflixClient};
use crate::models::{Notification, Notifications};
use crate::session::{SessionContext, SessionError, SessionStorage};

/// Shown when the movie list cannot be loaded.
pub const MOVIES_UNAVAILABLE: &str = "Something went wrong. Please try again later.";

/// Movie list failures stay up a little longer than other messages.
const MOVIES_UNAVAILABLE_DURATION_MS: u64 = 3000;

/// Data for the movie list.
#[derive(Debug, Clone, Default)]
pub struct MoviesView {
    pub movies: Vec<Movie>,
    /// The user's favorites as full movie records.
    pub favorites: Vec<Movie>,
    /// Favorite IDs from the session snapshot, kept when the favorites
    /// fetch failed so cards still match what a toggle will do.
    pub cached_favorites: Favorites,
}

impl MoviesView {
    #[must_use]
    pub fn is_favorite(&self, id: &MovieId) -> bool {
        self.favorites.iter().any(|movie| &movie.id == id) || self.cached_favorites.contains(id)
    }
}

/// Push a notification for a failed call, unless it was cancelled.
fn report(notes: &mut Notifications, err: &ApiError, message: impl FnOnce() -> String) {
    if err.is_cancelled() {
        debug!("Skipping notification for cancelled request");
        return;
    }
    notes.notify(message());
}

/// Load the movie list and the user's favorites.
///
/// Favorites are skipped when there is no user in the session. A successful
/// favorites fetch also refreshes the cached favorite IDs.
///
/// # Errors
///
/// Returns an error only if session storage fails.
#[instrument(skip_all)]
pub async fn load_movies<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
) -> Result<MoviesView, SessionError> {
    let token = session.token().await?;
    let mut view = MoviesView::default();

    match api.list_movies(token.as_ref()).await {
        Ok(movies) => view.movies = movies,
        Err(e) if e.is_cancelled() => {}
        Err(_) => notes.push(
            Notification::new(MOVIES_UNAVAILABLE).with_duration(MOVIES_UNAVAILABLE_DURATION_MS),
        ),
    }

    let Some(mut user) = session.user().await? else {
        return Ok(view);
    };

    match api.list_favorites(&user.username, token.as_ref()).await {
        Ok(favorites) => {
            let ids: Favorites = favorites.iter().map(|movie| movie.id.clone()).collect();
            if ids != user.favorite_movies {
                user.favorite_movies = ids;
                session.update_user(&user).await?;
            }
            view.favorites = favorites;
        }
        Err(e) => {
            report(notes, &e, || {
                "Error fetching favorite movies: Something went wrong.".to_string()
            });
            view.cached_favorites = user.favorite_movies;
        }
    }

    Ok(view)
}

/// Add or remove a favorite, depending on whether it is one now.
///
/// Does nothing without a session user. Returns `true` when the server
/// accepted the change.
///
/// # Errors
///
/// Returns an error only if session storage fails.
pub async fn toggle_favorite<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
    movie_id: &MovieId,
) -> Result<bool, SessionError> {
    let Some(user) = session.user().await? else {
        return Ok(false);
    };

    if user.is_favorite(movie_id) {
        remove_favorite(api, session, notes, movie_id).await
    } else {
        add_favorite(api, session, notes, movie_id).await
    }
}

/// Add a favorite on the server, then in the session snapshot.
///
/// Returns `true` when the server accepted the change.
///
/// # Errors
///
/// Returns an error only if session storage fails.
#[instrument(skip_all, fields(movie_id = %movie_id))]
pub async fn add_favorite<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
    movie_id: &MovieId,
) -> Result<bool, SessionError> {
    let Some(mut user) = session.user().await? else {
        return Ok(false);
    };
    let token = session.token().await?;

    match api.add_favorite(&user.username, movie_id, token.as_ref()).await {
        Ok(confirmed) => {
            apply_confirmed(&mut user, confirmed, |favorites| {
                favorites.add(movie_id.clone());
            });
            session.update_user(&user).await?;
            notes.notify("Movie added to favorites!");
            Ok(true)
        }
        Err(e) => {
            report(notes, &e, || format!("Error adding movie to favorites: {e}"));
            Ok(false)
        }
    }
}

/// Remove a favorite on the server, then from the session snapshot.
///
/// Removing a movie that is not a favorite leaves the list unchanged.
/// Returns `true` when the server accepted the change.
///
/// # Errors
///
/// Returns an error only if session storage fails.
#[instrument(skip_all, fields(movie_id = %movie_id))]
pub async fn remove_favorite<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
    movie_id: &MovieId,
) -> Result<bool, SessionError> {
    let Some(mut user) = session.user().await? else {
        return Ok(false);
    };
    let token = session.token().await?;

    match api
        .remove_favorite(&user.username, movie_id, token.as_ref())
        .await
    {
        Ok(confirmed) => {
            apply_confirmed(&mut user, confirmed, |favorites| {
                favorites.remove(movie_id);
            });
            session.update_user(&user).await?;
            notes.notify("Movie removed from favorites!");
            Ok(true)
        }
        Err(e) => {
            report(notes, &e, || {
                format!("Error removing movie from favorites: {e}")
            });
            Ok(false)
        }
    }
}

/// Take the server's favorites when it sent the user back, otherwise apply
/// the change locally.
fn apply_confirmed(user: &mut User, confirmed: Option<User>, change: impl FnOnce(&mut Favorites)) {
    match confirmed {
        Some(server) if server.username == user.username => {
            user.favorite_movies = server.favorite_movies;
        }
        _ => change(&mut user.favorite_movies),
    }
}

/// Fetch one movie for the synopsis view.
///
/// # Errors
///
/// Returns an error only if session storage fails.
pub async fn movie_synopsis<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
    title: &str,
) -> Result<Option<Movie>, SessionError> {
    let token = session.token().await?;
    Ok(match api.get_movie(title, token.as_ref()).await {
        Ok(movie) => Some(movie),
        Err(e) => {
            report(notes, &e, || e.to_string());
            None
        }
    })
}

/// Fetch a genre for the genre view.
///
/// # Errors
///
/// Returns an error only if session storage fails.
pub async fn genre_detail<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
    name: &str,
) -> Result<Option<Genre>, SessionError> {
    let token = session.token().await?;
    Ok(match api.get_genre(name, token.as_ref()).await {
        Ok(genre) => Some(genre),
        Err(e) => {
            report(notes, &e, || e.to_string());
            None
        }
    })
}

/// Fetch a director for the director view.
///
/// # Errors
///
/// Returns an error only if session storage fails.
pub async fn director_detail<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
    name: &str,
) -> Result<Option<Director>, SessionError> {
    let token = session.token().await?;
    Ok(match api.get_director(name, token.as_ref()).await {
        Ok(director) => Some(director),
        Err(e) => {
            report(notes, &e, || e.to_string());
            None
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::services::test_support::{
        anonymous_session, client_for, logged_in_session, movie_json, user_json,
    };

    fn favorite_ids(user: &User) -> Vec<&str> {
        user.favorite_movies.iter().map(MovieId::as_str).collect()
    }

    #[tokio::test]
    async fn test_load_movies_with_favorites() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .and(header("authorization", "Bearer jwt-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                movie_json("m1", "Heat"),
                movie_json("m2", "Ronin"),
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/moviebuff42/movies"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([movie_json("m2", "Ronin")])),
            )
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&["m1"]).await;
        let mut notes = Notifications::new();
        let view = load_movies(&client_for(&server), &session, &mut notes)
            .await
            .unwrap();

        assert!(notes.is_empty());
        assert_eq!(view.movies.len(), 2);
        assert!(view.is_favorite(&MovieId::new("m2")));
        assert!(!view.is_favorite(&MovieId::new("m1")));

        let user = session.user().await.unwrap().unwrap();
        assert_eq!(favorite_ids(&user), ["m2"]);
    }

    #[tokio::test]
    async fn test_load_movies_failure_notifies_for_three_seconds() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/moviebuff42/movies"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&[]).await;
        let mut notes = Notifications::new();
        let view = load_movies(&client_for(&server), &session, &mut notes)
            .await
            .unwrap();

        assert!(view.movies.is_empty());
        let notes = notes.into_vec();
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].message, MOVIES_UNAVAILABLE);
        assert_eq!(notes[0].duration_ms, 3000);
        assert_eq!(
            notes[1].message,
            "Error fetching favorite movies: Something went wrong."
        );
        assert_eq!(notes[1].duration_ms, 2000);
    }

    #[tokio::test]
    async fn test_load_movies_without_user_skips_favorites() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let (session, _) = anonymous_session().await;
        let mut notes = Notifications::new();
        load_movies(&client_for(&server), &session, &mut notes)
            .await
            .unwrap();

        assert!(notes.is_empty());
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_toggle_adds_missing_favorite() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/moviebuff42/movies/m2"))
            .respond_with(ResponseTemplate::new(201).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&["m1"]).await;
        let mut notes = Notifications::new();
        let accepted =
            toggle_favorite(&client_for(&server), &session, &mut notes, &MovieId::new("m2"))
                .await
                .unwrap();

        assert!(accepted);
        let user = session.user().await.unwrap().unwrap();
        assert_eq!(favorite_ids(&user), ["m1", "m2"]);
        assert_eq!(notes.into_vec()[0].message, "Movie added to favorites!");
    }

    #[tokio::test]
    async fn test_toggle_removes_present_favorite() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/users/moviebuff42/movies/m1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json(&[])))
            .expect(1)
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&["m1"]).await;
        let mut notes = Notifications::new();
        toggle_favorite(&client_for(&server), &session, &mut notes, &MovieId::new("m1"))
            .await
            .unwrap();

        let user = session.user().await.unwrap().unwrap();
        assert!(user.favorite_movies.is_empty());
        assert_eq!(notes.into_vec()[0].message, "Movie removed from favorites!");
    }

    #[tokio::test]
    async fn test_adding_present_favorite_leaves_no_duplicate() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/moviebuff42/movies/m1"))
            .respond_with(ResponseTemplate::new(201).set_body_json(user_json(&["m1", "m1"])))
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&["m1"]).await;
        let mut notes = Notifications::new();
        add_favorite(&client_for(&server), &session, &mut notes, &MovieId::new("m1"))
            .await
            .unwrap();

        let user = session.user().await.unwrap().unwrap();
        assert_eq!(favorite_ids(&user), ["m1"]);
    }

    #[tokio::test]
    async fn test_removing_absent_favorite_is_a_no_op() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/users/moviebuff42/movies/m9"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&["m1", "m2"]).await;
        let mut notes = Notifications::new();
        remove_favorite(&client_for(&server), &session, &mut notes, &MovieId::new("m9"))
            .await
            .unwrap();

        let user = session.user().await.unwrap().unwrap();
        assert_eq!(favorite_ids(&user), ["m1", "m2"]);
    }

    #[tokio::test]
    async fn test_failed_add_leaves_local_list_unchanged() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/moviebuff42/movies/m2"))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&["m1"]).await;
        let mut notes = Notifications::new();
        let accepted = add_favorite(&client_for(&server), &session, &mut notes, &MovieId::new("m2"))
            .await
            .unwrap();

        assert!(!accepted);
        let user = session.user().await.unwrap().unwrap();
        assert_eq!(favorite_ids(&user), ["m1"]);
        assert_eq!(
            notes.into_vec()[0].message,
            "Error adding movie to favorites: Unauthorized: \"Unauthorized\""
        );
    }

    #[tokio::test]
    async fn test_failed_add_of_present_favorite_is_not_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/moviebuff42/movies/m1"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&["m1"]).await;
        let mut notes = Notifications::new();
        let accepted = add_favorite(&client_for(&server), &session, &mut notes, &MovieId::new("m1"))
            .await
            .unwrap();

        assert!(!accepted);
        assert_eq!(
            notes.into_vec()[0].message,
            "Error adding movie to favorites: Something bad happened; please try again later."
        );
    }

    #[tokio::test]
    async fn test_cached_favorites_used_when_fetch_fails() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/movies"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([movie_json("m1", "Heat")])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/moviebuff42/movies"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&["m1"]).await;
        let mut notes = Notifications::new();
        let view = load_movies(&client_for(&server), &session, &mut notes)
            .await
            .unwrap();

        assert!(view.favorites.is_empty());
        assert!(view.is_favorite(&MovieId::new("m1")));
        assert!(!view.is_favorite(&MovieId::new("m2")));
    }

    #[tokio::test]
    async fn test_cancelled_toggle_is_silent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/users/moviebuff42/movies/m2"))
            .respond_with(ResponseTemplate::new(201).set_delay(Duration::from_secs(10)))
            .mount(&server)
            .await;

        let (session, _) = logged_in_session(&["m1"]).await;
        let cancel = CancellationToken::new();
        let api = client_for(&server).with_cancellation(cancel.clone());
        cancel.cancel();

        let mut notes = Notifications::new();
        toggle_favorite(&api, &session, &mut notes, &MovieId::new("m2"))
            .await
            .unwrap();

        assert!(notes.is_empty());
        let user = session.user().await.unwrap().unwrap();
        assert_eq!(favorite_ids(&user), ["m1"]);
    }

    #[tokio::test]
    async fn test_detail_views() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/genres/Thriller"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "Name": "Thriller", "Description": "Suspense." })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/directors/Nobody"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Director not found"))
            .mount(&server)
            .await;

        let api = client_for(&server);
        let (session, _) = logged_in_session(&[]).await;
        let mut notes = Notifications::new();

        let genre = genre_detail(&api, &session, &mut notes, "Thriller")
            .await
            .unwrap();
        assert_eq!(genre.unwrap().description, "Suspense.");

        let director = director_detail(&api, &session, &mut notes, "Nobody")
            .await
            .unwrap();
        assert!(director.is_none());
        assert_eq!(
            notes.into_vec()[0].message,
            "Resource not found: \"Director not found\""
        );
    }
}
