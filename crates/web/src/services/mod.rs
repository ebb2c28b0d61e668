//! View services.
//!
//! Each function is one view action: it reads the token from the session at
//! call time, calls the API client, updates the session on success, and
//! reports the outcome through a [`Notifications`](crate::models::Notifications)
//! sink. API failures become notifications. Only session storage failures
//! are returned as errors.
//!
//! - `catalog` - movie list, favorites, synopsis/genre/director detail
//! - `account` - registration, login, logout, profile, account deletion
//!
//! A cancelled request never produces a notification.

pub mod account;
pub mod catalog;

#[cfg(test)]
pub(crate) mod test_support;
