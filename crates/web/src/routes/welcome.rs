//! Welcome page: registration, login and logout.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use myflix_core::{Email, Username};

use super::{Page, finish, parse_form_birthday};
use crate::api::{Credentials, Registration};
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{CurrentSession, ViewScope};
use crate::models::{Navigation, Notifications, Route};
use crate::services::account;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: SecretString,
    pub email: String,
    #[serde(default)]
    pub birthday: String,
}

impl RegisterForm {
    fn into_registration(self) -> Result<Registration, String> {
        let username =
            Username::parse(&self.username).map_err(|e| format!("Invalid username: {e}"))?;
        let email = Email::parse(&self.email).map_err(|e| format!("Invalid email: {e}"))?;
        let birthday = parse_form_birthday(&self.birthday)?;
        Ok(Registration {
            username,
            password: self.password,
            email,
            birthday,
        })
    }
}

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: SecretString,
}

// =============================================================================
// Templates
// =============================================================================

/// Welcome page template.
#[derive(Template, WebTemplate)]
#[template(path = "welcome.html")]
pub struct WelcomeTemplate {
    pub page: Page,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the register and login forms.
pub async fn show(current: CurrentSession) -> Result<WelcomeTemplate, AppError> {
    Ok(WelcomeTemplate {
        page: Page::load(&current, Notifications::new()).await?,
    })
}

/// Handle registration form submission.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
    Form(form): Form<RegisterForm>,
) -> Result<Redirect, AppError> {
    let mut notes = Notifications::new();
    let next = match form.into_registration() {
        Ok(registration) => {
            account::register(&scope.client(state.api()), &mut notes, &registration).await
        }
        Err(message) => {
            notes.notify(message);
            Navigation::Stay
        }
    };
    finish(&current, notes, next, Route::Welcome).await
}

/// Handle login form submission.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    scope: ViewScope,
    current: CurrentSession,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    let credentials = Credentials::new(form.username, form.password);
    let mut notes = Notifications::new();
    let next = account::login(
        &scope.client(state.api()),
        &current.context,
        &mut notes,
        &credentials,
    )
    .await?;

    if next == Navigation::To(Route::Movies) {
        current.cycle_id().await?;
        set_sentry_user(&credentials.username);
    }

    finish(&current, notes, next, Route::Welcome).await
}

/// Handle logout.
pub async fn logout(current: CurrentSession) -> Result<Redirect, AppError> {
    let next = account::logout(&current.context).await?;
    clear_sentry_user();
    finish(&current, Notifications::new(), next, Route::Welcome).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, birthday: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            password: SecretString::from("hunter2"),
            email: email.to_string(),
            birthday: birthday.to_string(),
        }
    }

    #[test]
    fn test_register_form_validation() {
        let registration = form(" moviebuff42 ", "buff@example.com", "1990-04-12")
            .into_registration()
            .unwrap();
        assert_eq!(registration.username.as_str(), "moviebuff42");
        assert!(registration.birthday.is_some());

        assert!(
            form("movie buff", "buff@example.com", "")
                .into_registration()
                .unwrap_err()
                .starts_with("Invalid username")
        );
        assert!(
            form("moviebuff42", "not-an-email", "")
                .into_registration()
                .unwrap_err()
                .starts_with("Invalid email")
        );
    }

    #[test]
    fn test_login_form_debug_hides_password() {
        let form = LoginForm {
            username: "moviebuff42".to_string(),
            password: SecretString::from("hunter2"),
        };
        assert!(!format!("{form:?}").contains("hunter2"));
    }
}
