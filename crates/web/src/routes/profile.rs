//! Profile page, profile editing and account deletion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::instrument;

use myflix_core::{Email, Movie, MovieId, User, Username};

use super::{Page, finish, parse_form_birthday, segment_path};
use crate::api::ProfileUpdate;
use crate::error::{AppError, clear_sentry_user};
use crate::middleware::{CurrentSession, ViewScope};
use crate::models::{Navigation, Notifications, Route};
use crate::services::{account, catalog};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Account deletion form data.
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    #[serde(default)]
    pub confirm: String,
}

impl DeleteForm {
    fn confirmed(&self) -> bool {
        self.confirm == "yes"
    }
}

/// Profile edit form data.
///
/// An empty password keeps the current one.
#[derive(Debug, Deserialize)]
pub struct EditForm {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub birthday: String,
    pub password: Option<SecretString>,
}

impl EditForm {
    fn into_update(self) -> Result<ProfileUpdate, String> {
        let username =
            Username::parse(&self.username).map_err(|e| format!("Invalid username: {e}"))?;
        let email = Email::parse(&self.email).map_err(|e| format!("Invalid email: {e}"))?;
        let birthday = parse_form_birthday(&self.birthday)?;
        let password = self
            .password
            .filter(|password| !password.expose_secret().is_empty());
        Ok(ProfileUpdate {
            username,
            email,
            birthday,
            password,
        })
    }
}

// =============================================================================
// View Types
// =============================================================================

/// A favorite movie on the profile page.
pub struct FavoriteRow {
    pub movie: Movie,
    pub synopsis_href: String,
    pub remove_action: String,
}

impl FavoriteRow {
    fn new(movie: Movie) -> Self {
        Self {
            synopsis_href: segment_path(&["movies", &movie.title, "synopsis"]),
            remove_action: segment_path(&["profile", "favorites", movie.id.as_str(), "remove"]),
            movie,
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "profile/show.html")]
pub struct ProfileTemplate {
    pub page: Page,
    pub user: Option<User>,
    pub favorites: Vec<FavoriteRow>,
}

/// Profile edit template, prefilled from the session user.
#[derive(Template, WebTemplate)]
#[template(path = "profile/edit.html")]
pub struct EditProfileTemplate {
    pub page: Page,
    pub username: String,
    pub email: String,
    pub birthday: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the profile and favorite movies.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
) -> Result<ProfileTemplate, AppError> {
    let mut notes = Notifications::new();
    let view = account::load_profile(&scope.client(state.api()), &current.context, &mut notes)
        .await?;

    Ok(ProfileTemplate {
        page: Page::load(&current, notes).await?,
        user: view.user,
        favorites: view.favorites.into_iter().map(FavoriteRow::new).collect(),
    })
}

/// Remove a movie from the user's favorites.
#[instrument(skip_all)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
    Path(movie_id): Path<String>,
) -> Result<Redirect, AppError> {
    let mut notes = Notifications::new();
    catalog::remove_favorite(
        &scope.client(state.api()),
        &current.context,
        &mut notes,
        &MovieId::new(movie_id),
    )
    .await?;
    finish(&current, notes, Navigation::Stay, Route::Profile).await
}

/// Delete the account after explicit confirmation.
#[instrument(skip_all)]
pub async fn delete_account(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
    Form(form): Form<DeleteForm>,
) -> Result<Redirect, AppError> {
    let mut notes = Notifications::new();
    let next = account::delete_account(
        &scope.client(state.api()),
        &current.context,
        &mut notes,
        form.confirmed(),
    )
    .await?;

    if next == Navigation::To(Route::Welcome) {
        clear_sentry_user();
    }
    finish(&current, notes, next, Route::Profile).await
}

/// Display the edit form.
pub async fn edit_form(current: CurrentSession) -> Result<EditProfileTemplate, AppError> {
    let user = current.context.user().await?;
    let page = Page::load(&current, Notifications::new()).await?;

    Ok(match user {
        Some(user) => EditProfileTemplate {
            page,
            username: user.username.to_string(),
            email: user.email.to_string(),
            birthday: user.birthday_display(),
        },
        None => EditProfileTemplate {
            page,
            username: String::new(),
            email: String::new(),
            birthday: String::new(),
        },
    })
}

/// Handle profile edit submission.
#[instrument(skip_all)]
pub async fn edit(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
    Form(form): Form<EditForm>,
) -> Result<Redirect, AppError> {
    let mut notes = Notifications::new();
    let next = match form.into_update() {
        Ok(update) => {
            account::edit_profile(&scope.client(state.api()), &current.context, &mut notes, &update)
                .await?
        }
        Err(message) => {
            notes.notify(message);
            Navigation::Stay
        }
    };
    finish(&current, notes, next, Route::EditProfile).await
}
