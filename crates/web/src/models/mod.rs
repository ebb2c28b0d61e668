//! View-facing models shared by the web front-end and the terminal client.
//!
//! - [`Notification`] is a transient message: a toast in the browser, a line
//!   on the terminal.
//! - [`Navigation`] tells the caller where to go after an action.

mod navigation;
mod notification;

pub use navigation::{Navigation, Route};
pub use notification::{Notification, Notifications};
