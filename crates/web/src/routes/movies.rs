//! Movie list, favorite toggles and detail pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::Redirect,
};
use tracing::instrument;

use myflix_core::{Director, Genre, Movie, MovieId};

use super::{Page, finish, segment_path};
use crate::error::{AppError, add_breadcrumb};
use crate::middleware::{CurrentSession, ViewScope};
use crate::models::{Navigation, Notifications, Route};
use crate::services::catalog;
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// A movie as shown on a card, with its links precomputed.
pub struct MovieCard {
    pub movie: Movie,
    pub favorite: bool,
    pub synopsis_href: String,
    pub genre_href: String,
    pub director_href: String,
    pub toggle_action: String,
}

impl MovieCard {
    #[must_use]
    pub fn new(movie: Movie, favorite: bool) -> Self {
        Self {
            synopsis_href: segment_path(&["movies", &movie.title, "synopsis"]),
            genre_href: segment_path(&["genres", &movie.genre.name]),
            director_href: segment_path(&["directors", &movie.director.name]),
            toggle_action: segment_path(&["movies", movie.id.as_str(), "favorite"]),
            movie,
            favorite,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Movie list template.
#[derive(Template, WebTemplate)]
#[template(path = "movies/index.html")]
pub struct MoviesTemplate {
    pub page: Page,
    pub cards: Vec<MovieCard>,
}

/// Synopsis detail template.
#[derive(Template, WebTemplate)]
#[template(path = "movies/synopsis.html")]
pub struct SynopsisTemplate {
    pub page: Page,
    pub title: String,
    pub movie: Option<Movie>,
}

/// Genre detail template.
#[derive(Template, WebTemplate)]
#[template(path = "genre.html")]
pub struct GenreTemplate {
    pub page: Page,
    pub name: String,
    pub genre: Option<Genre>,
}

/// Director detail template.
#[derive(Template, WebTemplate)]
#[template(path = "director.html")]
pub struct DirectorTemplate {
    pub page: Page,
    pub name: String,
    pub director: Option<Director>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the movie list.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
) -> Result<MoviesTemplate, AppError> {
    let mut notes = Notifications::new();
    let view = catalog::load_movies(&scope.client(state.api()), &current.context, &mut notes)
        .await?;

    let cards = view
        .movies
        .iter()
        .map(|movie| MovieCard::new(movie.clone(), view.is_favorite(&movie.id)))
        .collect();

    Ok(MoviesTemplate {
        page: Page::load(&current, notes).await?,
        cards,
    })
}

/// Toggle a movie in the user's favorites.
#[instrument(skip_all)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
    Path(movie_id): Path<String>,
) -> Result<Redirect, AppError> {
    add_breadcrumb("favorites", "Toggled favorite", &[("movie_id", &movie_id)]);

    let mut notes = Notifications::new();
    catalog::toggle_favorite(
        &scope.client(state.api()),
        &current.context,
        &mut notes,
        &MovieId::new(movie_id),
    )
    .await?;
    finish(&current, notes, Navigation::Stay, Route::Movies).await
}

/// Display a movie's synopsis.
pub async fn synopsis(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
    Path(title): Path<String>,
) -> Result<SynopsisTemplate, AppError> {
    let mut notes = Notifications::new();
    let movie = catalog::movie_synopsis(
        &scope.client(state.api()),
        &current.context,
        &mut notes,
        &title,
    )
    .await?;

    Ok(SynopsisTemplate {
        page: Page::load(&current, notes).await?,
        title,
        movie,
    })
}

/// Display a genre.
pub async fn genre(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
    Path(name): Path<String>,
) -> Result<GenreTemplate, AppError> {
    let mut notes = Notifications::new();
    let genre =
        catalog::genre_detail(&scope.client(state.api()), &current.context, &mut notes, &name)
            .await?;

    Ok(GenreTemplate {
        page: Page::load(&current, notes).await?,
        name,
        genre,
    })
}

/// Display a director.
pub async fn director(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
    Path(name): Path<String>,
) -> Result<DirectorTemplate, AppError> {
    let mut notes = Notifications::new();
    let director =
        catalog::director_detail(&scope.client(state.api()), &current.context, &mut notes, &name)
            .await?;

    Ok(DirectorTemplate {
        page: Page::load(&current, notes).await?,
        name,
        director,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_card_links_are_encoded() {
        let movie: Movie = serde_json::from_value(serde_json::json!({
            "_id": "m1",
            "Title": "The Dark Knight",
            "Genre": { "Name": "Action", "Description": "" },
            "Director": { "Name": "Christopher Nolan", "Bio": "" }
        }))
        .unwrap();

        let card = MovieCard::new(movie, true);
        assert_eq!(card.synopsis_href, "/movies/The%20Dark%20Knight/synopsis");
        assert_eq!(card.genre_href, "/genres/Action");
        assert_eq!(card.director_href, "/directors/Christopher%20Nolan");
        assert_eq!(card.toggle_action, "/movies/m1/favorite");
        assert!(card.favorite);
    }
}
