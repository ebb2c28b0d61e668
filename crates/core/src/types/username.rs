//! Account username type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors returned by [`Username::parse`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    /// Nothing was entered.
    #[error("username cannot be empty")]
    Empty,
    /// The myFlix API only accepts letters and digits.
    #[error("username may only contain letters and digits (found {0:?})")]
    InvalidCharacter(char),
}

/// The unique identifier of a myFlix account.
///
/// Usernames appear in request paths (`/users/{username}`), so form input is
/// restricted to alphanumeric characters, matching what the API accepts at
/// registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Parse a `Username` from user input.
    ///
    /// # Errors
    ///
    /// Returns [`UsernameError::Empty`] for blank input and
    /// [`UsernameError::InvalidCharacter`] for the first non-alphanumeric
    /// character.
    pub fn parse(input: &str) -> Result<Self, UsernameError> {
        let s = input.trim();
        if s.is_empty() {
            return Err(UsernameError::Empty);
        }
        if let Some(c) = s.chars().find(|c| !c.is_alphanumeric()) {
            return Err(UsernameError::InvalidCharacter(c));
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
