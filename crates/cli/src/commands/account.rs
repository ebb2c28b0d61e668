//! Account commands: register, login, logout, status, profile, edit and
//! delete-account.

use std::io::Write;

use chrono::NaiveDate;
use secrecy::SecretString;

use myflix_core::{Email, Username, parse_birthday};
use myflix_web::api::{Credentials, ProfileUpdate, Registration};
use myflix_web::models::{Navigation, Notifications, Route};
use myflix_web::services::account;

use super::{CliError, Context, succeeded};

/// Fields to change on `myflix edit`; anything left out keeps its value.
#[derive(Debug, Default)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    /// An empty value clears the birthday.
    pub birthday: Option<String>,
    pub password: Option<String>,
}

fn parse_username(raw: &str) -> Result<Username, CliError> {
    Username::parse(raw).map_err(|e| CliError::Invalid(format!("Invalid username: {e}")))
}

fn parse_email(raw: &str) -> Result<Email, CliError> {
    Email::parse(raw).map_err(|e| CliError::Invalid(format!("Invalid email: {e}")))
}

fn parse_optional_birthday(raw: &str) -> Result<Option<NaiveDate>, CliError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_birthday(raw)
        .map(Some)
        .map_err(|_| CliError::Invalid("Invalid birthday: use YYYY-MM-DD".to_string()))
}

/// Create an account.
pub async fn register<W: Write + Send>(
    ctx: &mut Context<W>,
    username: &str,
    email: &str,
    password: String,
    birthday: Option<&str>,
) -> Result<(), CliError> {
    let registration = Registration {
        username: parse_username(username)?,
        password: SecretString::from(password),
        email: parse_email(email)?,
        birthday: parse_optional_birthday(birthday.unwrap_or_default())?,
    };

    let mut notes = Notifications::new();
    let next = account::register(&ctx.api, &mut notes, &registration).await;
    ctx.report(&notes)?;
    succeeded(next == Navigation::To(Route::Welcome))
}

/// Log in and persist the session.
pub async fn login<W: Write + Send>(
    ctx: &mut Context<W>,
    username: String,
    password: String,
) -> Result<(), CliError> {
    let credentials = Credentials::new(username, SecretString::from(password));
    let mut notes = Notifications::new();
    let next = account::login(&ctx.api, &ctx.session, &mut notes, &credentials).await?;
    ctx.report(&notes)?;
    succeeded(next == Navigation::To(Route::Movies))
}

pub async fn logout<W: Write + Send>(ctx: &mut Context<W>) -> Result<(), CliError> {
    account::logout(&ctx.session).await?;
    writeln!(ctx.out, "Logged out.")?;
    Ok(())
}

/// Show who is logged in and which API is used.
pub async fn status<W: Write + Send>(ctx: &mut Context<W>) -> Result<(), CliError> {
    match ctx.session.username().await? {
        Some(username) if ctx.session.is_authenticated() => {
            writeln!(ctx.out, "Logged in as {username}")?;
        }
        _ => writeln!(ctx.out, "Not logged in.")?,
    }
    writeln!(ctx.out, "API: {}", ctx.api.base_url())?;
    Ok(())
}

/// Show the profile and favorite movies.
pub async fn profile<W: Write + Send>(ctx: &mut Context<W>) -> Result<(), CliError> {
    ctx.require_user().await?;

    let mut notes = Notifications::new();
    let view = account::load_profile(&ctx.api, &ctx.session, &mut notes).await?;
    ctx.report(&notes)?;

    if let Some(user) = &view.user {
        writeln!(ctx.out, "Username: {}", user.username)?;
        writeln!(ctx.out, "Email:    {}", user.email)?;
        writeln!(ctx.out, "Birthday: {}", user.birthday_display())?;
    }
    writeln!(ctx.out, "Favorite movies:")?;
    for movie in &view.favorites {
        writeln!(ctx.out, "  {}  {}", movie.id, movie.title)?;
    }

    // The profile view only ever notifies failures.
    succeeded(notes.is_empty())
}

/// Update the profile, keeping unspecified fields.
pub async fn edit<W: Write + Send>(
    ctx: &mut Context<W>,
    changes: ProfileChanges,
) -> Result<(), CliError> {
    let user = ctx.require_user().await?;

    let mut update = ProfileUpdate::from_user(&user);
    if let Some(username) = changes.username.as_deref() {
        update.username = parse_username(username)?;
    }
    if let Some(email) = changes.email.as_deref() {
        update.email = parse_email(email)?;
    }
    if let Some(birthday) = changes.birthday.as_deref() {
        update.birthday = parse_optional_birthday(birthday)?;
    }
    update.password = changes
        .password
        .filter(|password| !password.is_empty())
        .map(SecretString::from);

    let mut notes = Notifications::new();
    let next = account::edit_profile(&ctx.api, &ctx.session, &mut notes, &update).await?;
    ctx.report(&notes)?;
    succeeded(next == Navigation::To(Route::Profile))
}

/// Delete the account; `confirmed` must be set.
pub async fn delete_account<W: Write + Send>(
    ctx: &mut Context<W>,
    confirmed: bool,
) -> Result<(), CliError> {
    if !confirmed {
        return Err(CliError::Invalid(
            "Pass --yes to confirm account deletion.".to_string(),
        ));
    }
    ctx.require_user().await?;

    let mut notes = Notifications::new();
    let next = account::delete_account(&ctx.api, &ctx.session, &mut notes, true).await?;
    ctx.report(&notes)?;
    succeeded(next == Navigation::To(Route::Welcome))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::commands::test_support::{context, logged_in, output, user_json};

    #[tokio::test]
    async fn test_login_persists_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_partial_json(json!({ "Username": "moviebuff42" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "user": user_json(&[]), "token": "jwt-token" })),
            )
            .mount(&server)
            .await;

        let (mut ctx, dir) = context(&server).await;
        login(&mut ctx, "moviebuff42".to_string(), "hunter2".to_string())
            .await
            .unwrap();

        assert!(output(&ctx).contains("User logged in successfully!"));
        assert!(ctx.session.is_authenticated());
        assert!(dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_bad_login_fails_and_stores_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("No such user"))
            .mount(&server)
            .await;

        let (mut ctx, dir) = context(&server).await;
        let result = login(&mut ctx, "moviebuff42".to_string(), "wrong".to_string()).await;

        assert!(matches!(result, Err(CliError::Failed)));
        assert_eq!(output(&ctx).trim(), "Invalid username or password.");
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email_before_calling_api() {
        let server = MockServer::start().await;
        let (mut ctx, _dir) = context(&server).await;

        let result = register(&mut ctx, "moviebuff42", "nope", "pw".to_string(), None).await;

        assert!(matches!(result, Err(CliError::Invalid(msg)) if msg.starts_with("Invalid email")));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_edit_keeps_unspecified_fields() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/users/moviebuff42"))
            .and(header("authorization", "Bearer jwt-token"))
            .and(body_partial_json(json!({
                "Username": "moviebuff42",
                "Email": "new@example.com",
                "Birthday": "1990-04-12"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Username": "moviebuff42",
                "Email": "new@example.com",
                "Birthday": "1990-04-12",
                "FavoriteMovies": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (mut ctx, _dir) = logged_in(&server, &[]).await;
        edit(
            &mut ctx,
            ProfileChanges {
                email: Some("new@example.com".to_string()),
                ..ProfileChanges::default()
            },
        )
        .await
        .unwrap();

        assert!(output(&ctx).contains("User updated successfully"));
        let user = ctx.session.user().await.unwrap().unwrap();
        assert_eq!(user.email.as_str(), "new@example.com");
    }

    #[tokio::test]
    async fn test_delete_account_requires_confirmation() {
        let server = MockServer::start().await;
        let (mut ctx, _dir) = logged_in(&server, &[]).await;

        let result = delete_account(&mut ctx, false).await;

        assert!(matches!(result, Err(CliError::Invalid(_))));
        assert!(ctx.session.is_authenticated());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_profile_requires_login() {
        let server = MockServer::start().await;
        let (mut ctx, _dir) = context(&server).await;

        assert!(matches!(profile(&mut ctx).await, Err(CliError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_logout_and_status() {
        let server = MockServer::start().await;
        let (mut ctx, _dir) = logged_in(&server, &[]).await;

        status(&mut ctx).await.unwrap();
        logout(&mut ctx).await.unwrap();
        status(&mut ctx).await.unwrap();

        let out = output(&ctx);
        assert!(out.contains("Logged in as moviebuff42"));
        assert!(out.contains("Logged out."));
        assert!(out.contains("Not logged in."));
    }
}
