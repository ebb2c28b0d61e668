//! Account types.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use super::email::Email;
use super::favorites::Favorites;
use super::id::{MovieId, UserId};
use super::username::Username;

/// A myFlix account as returned by the API.
///
/// This is also the snapshot cached in the client session after login, so it
/// must survive a serialize/deserialize cycle through session storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    /// Server document ID.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    pub username: Username,
    pub email: Email,
    #[serde(default, with = "birthday")]
    pub birthday: Option<NaiveDate>,
    #[serde(default)]
    pub favorite_movies: Favorites,
}

impl User {
    /// Birthday as `YYYY-MM-DD`, or an empty string when unknown.
    #[must_use]
    pub fn birthday_display(&self) -> String {
        self.birthday
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default()
    }

    /// Returns `true` if the movie is in this user's favorites.
    #[must_use]
    pub fn is_favorite(&self, id: &MovieId) -> bool {
        self.favorite_movies.contains(id)
    }
}

/// Parse a birthday as the API or a form sends it.
///
/// Accepts a plain date (`1990-04-12`) or an RFC 3339 timestamp
/// (`1990-04-12T00:00:00.000Z`), keeping the UTC calendar date.
///
/// # Errors
///
/// Returns the date parse error when neither format matches.
pub fn parse_birthday(input: &str) -> Result<NaiveDate, chrono::ParseError> {
    let s = input.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(s).map(|dt| dt.naive_utc().date()))
}

mod birthday {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de};

    #[allow(clippy::ref_option)]
    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.filter(|s| !s.trim().is_empty())
            .map(|s| super::parse_birthday(&s).map_err(de::Error::custom))
            .transpose()
    }
}
