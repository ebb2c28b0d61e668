//! Registration, login, profile and account views.

use tracing::{info, instrument};

use myflix_core::{Movie, User};

use crate::api::{Credentials, LoginError, MyflixClient, ProfileUpdate, Registration};
use crate::models::{Navigation, Notifications, Route};
use crate::session::{SessionContext, SessionError, SessionStorage};

/// Create an account. The user still has to log in afterwards.
#[instrument(skip_all, fields(username = %registration.username))]
pub async fn register(
    api: &MyflixClient,
    notes: &mut Notifications,
    registration: &Registration,
) -> Navigation {
    match api.register(registration).await {
        Ok(user) => {
            info!(username = %user.username, "Account registered");
            notes.notify("User registered successfully! Please log in.");
            Navigation::To(Route::Welcome)
        }
        Err(e) if e.is_cancelled() => Navigation::Stay,
        Err(e) => {
            notes.notify(e.to_string());
            Navigation::Stay
        }
    }
}

/// Log in, then store the session.
///
/// Nothing is stored when the login call fails.
///
/// # Errors
///
/// Returns an error only if session storage fails.
#[instrument(skip_all, fields(username = %credentials.username))]
pub async fn login<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
    credentials: &Credentials,
) -> Result<Navigation, SessionError> {
    match api.login(credentials).await {
        Ok(login) => {
            session.login(&login).await?;
            notes.notify("User logged in successfully!");
            Ok(Navigation::To(Route::Movies))
        }
        Err(LoginError::Cancelled) => Ok(Navigation::Stay),
        Err(e) => {
            notes.notify(e.to_string());
            Ok(Navigation::Stay)
        }
    }
}

/// Clear the session and go back to the welcome screen.
///
/// # Errors
///
/// Returns an error if session storage cannot be cleared. The session is
/// unauthenticated either way.
pub async fn logout<S: SessionStorage>(
    session: &SessionContext<S>,
) -> Result<Navigation, SessionError> {
    session.logout().await?;
    Ok(Navigation::To(Route::Welcome))
}

/// Data for the profile view.
#[derive(Debug, Clone, Default)]
pub struct ProfileView {
    pub user: Option<User>,
    pub favorites: Vec<Movie>,
}

/// Fetch the user and their favorite movies.
///
/// On a failed user fetch the cached snapshot is shown unchanged. Both calls
/// are skipped when there is no user in the session.
///
/// # Errors
///
/// Returns an error only if session storage fails.
#[instrument(skip_all)]
pub async fn load_profile<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
) -> Result<ProfileView, SessionError> {
    let Some(cached) = session.user().await? else {
        return Ok(ProfileView::default());
    };
    let token = session.token().await?;
    let username = cached.username.clone();

    let user = match api.get_user(&username, token.as_ref()).await {
        Ok(fresh) => {
            if fresh != cached {
                session.update_user(&fresh).await?;
            }
            fresh
        }
        Err(e) => {
            if !e.is_cancelled() {
                notes.notify(format!("Error fetching user data: {e}"));
            }
            cached
        }
    };

    let favorites = match api.list_favorites(&username, token.as_ref()).await {
        Ok(favorites) => favorites,
        Err(e) => {
            if !e.is_cancelled() {
                notes.notify(format!("Error fetching favorite movies: {e}"));
            }
            Vec::new()
        }
    };

    Ok(ProfileView {
        user: Some(user),
        favorites,
    })
}

/// Save profile changes and replace the session snapshot.
///
/// # Errors
///
/// Returns an error only if session storage fails.
#[instrument(skip_all)]
pub async fn edit_profile<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
    update: &ProfileUpdate,
) -> Result<Navigation, SessionError> {
    let Some(username) = session.username().await? else {
        return Ok(Navigation::Stay);
    };
    let token = session.token().await?;

    match api.edit_user(&username, update, token.as_ref()).await {
        Ok(user) => {
            session.update_user(&user).await?;
            notes.notify("User updated successfully");
            Ok(Navigation::To(Route::Profile))
        }
        Err(e) if e.is_cancelled() => Ok(Navigation::Stay),
        Err(e) => {
            notes.notify(format!("Error updating user: {e}"));
            Ok(Navigation::Stay)
        }
    }
}

/// Delete the account and clear the session.
///
/// Nothing happens unless `confirmed` is set.
///
/// # Errors
///
/// Returns an error only if session storage fails.
#[instrument(skip_all)]
pub async fn delete_account<S: SessionStorage>(
    api: &MyflixClient,
    session: &SessionContext<S>,
    notes: &mut Notifications,
    confirmed: bool,
) -> Result<Navigation, SessionError> {
    if !confirmed {
        return Ok(Navigation::Stay);
    }
    let Some(username) = session.username().await? else {
        return Ok(Navigation::Stay);
    };
    let token = session.token().await?;

    match api.delete_user(&username, token.as_ref()).await {
        Ok(()) => {
            session.logout().await?;
            info!(username = %username, "Account deleted");
            notes.notify("Account deleted successfully");
            Ok(Navigation::To(Route::Welcome))
        }
        Err(e) if e.is_cancelled() => Ok(Navigation::Stay),
        Err(e) => {
            notes.notify(format!("Error deleting account: {e}"));
            Ok(Navigation::Stay)
        }
    }
}
