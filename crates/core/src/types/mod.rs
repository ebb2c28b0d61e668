//! Core types for myFlix.
//!
//! This module provides the catalog and account types plus type-safe
//! wrappers for identifiers, usernames and emails.

pub mod email;
pub mod favorites;
pub mod id;
pub mod movie;
pub mod user;
pub mod username;

pub use email::{Email, EmailError};
pub use favorites::Favorites;
pub use id::*;
pub use movie::{Director, Genre, Movie};
pub use user::{User, parse_birthday};
pub use username::{Username, UsernameError};
