//! Transient user-facing messages.

use serde::{Deserialize, Serialize};

/// A dismissible message with an action label and a display duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub message: String,
    /// Label of the dismiss button.
    pub action: String,
    /// How long the message stays up, in milliseconds.
    pub duration_ms: u64,
}

impl Notification {
    pub const DEFAULT_ACTION: &'static str = "OK";
    pub const DEFAULT_DURATION_MS: u64 = 2000;

    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            action: Self::DEFAULT_ACTION.to_string(),
            duration_ms: Self::DEFAULT_DURATION_MS,
        }
    }

    #[must_use]
    pub const fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}

/// Notifications raised while handling one action, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notifications(Vec<Notification>);

impl Notifications {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, notification: Notification) {
        self.0.push(notification);
    }

    /// Push a message with the default action and duration.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.push(Notification::new(message));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.0.iter()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<Notification> {
        self.0
    }
}

impl Extend<Notification> for Notifications {
    fn extend<I: IntoIterator<Item = Notification>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Notifications {
    type Item = Notification;
    type IntoIter = std::vec::IntoIter<Notification>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let note = Notification::new("Movie added to favorites!");
        assert_eq!(note.action, "OK");
        assert_eq!(note.duration_ms, 2000);
        assert_eq!(note.with_duration(3000).duration_ms, 3000);
    }

    #[test]
    fn test_notifications_keep_order() {
        let mut notes = Notifications::new();
        notes.notify("first");
        notes.push(Notification::new("second").with_duration(3000));

        let messages: Vec<_> = notes.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["first", "second"]);
        assert_eq!(notes.into_vec().len(), 2);
    }
}
