//! Request and response payloads for the myFlix API.
//!
//! Field names follow the API's PascalCase JSON. Passwords and tokens are
//! held as [`SecretString`] and redacted from `Debug` output.

use chrono::NaiveDate;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use myflix_core::{Email, User, Username};

/// Body of `POST /users`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Registration {
    pub username: Username,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
}

/// Body of `POST /login`.
///
/// The username is sent as typed; the server decides whether it exists.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub username: String,
    #[serde(serialize_with = "expose")]
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into().trim().to_owned(),
            password,
        }
    }
}

/// Body of `PUT /users/{username}`.
///
/// The password is only sent when the user typed a new one.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProfileUpdate {
    pub username: Username,
    pub email: Email,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "expose_optional"
    )]
    pub password: Option<SecretString>,
}

impl ProfileUpdate {
    /// Start an update from the current account, keeping every field.
    #[must_use]
    pub fn from_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            birthday: user.birthday,
            password: None,
        }
    }
}

/// Response of `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: SecretString,
}

fn expose<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[allow(clippy::ref_option)]
fn expose_optional<S: Serializer>(
    secret: &Option<SecretString>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(secret) => expose(secret, serializer),
        None => serializer.serialize_none(),
    }
}
