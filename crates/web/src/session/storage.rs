//! Storage backends for session entries.
//!
//! A backend is a tiny string key/value store. [`super::SessionContext`] is
//! the only caller; nothing else should read or write these entries.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_sessions::Session;

use super::{SessionError, keys};

/// Durable client-side storage for the session entries.
pub trait SessionStorage: Send + Sync {
    /// Read an entry, `None` when absent.
    fn read(
        &self,
        key: &'static str,
    ) -> impl Future<Output = Result<Option<String>, SessionError>> + Send;

    /// Write an entry, replacing any previous value.
    fn write(
        &self,
        key: &'static str,
        value: String,
    ) -> impl Future<Output = Result<(), SessionError>> + Send;

    /// Remove every session entry.
    fn clear(&self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// Server-side session record keyed by the browser's session cookie.
impl SessionStorage for Session {
    async fn read(&self, key: &'static str) -> Result<Option<String>, SessionError> {
        Ok(self.get::<String>(key).await?)
    }

    async fn write(&self, key: &'static str, value: String) -> Result<(), SessionError> {
        self.insert(key, value).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        // Flash notifications live in the same record and must survive logout.
        for key in keys::ALL {
            self.remove::<String>(key).await?;
        }
        Ok(())
    }
}

/// In-process storage, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<&'static str, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl SessionStorage for MemoryStorage {
    async fn read(&self, key: &'static str) -> Result<Option<String>, SessionError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn write(&self, key: &'static str, value: String) -> Result<(), SessionError> {
        self.entries.lock().await.insert(key, value);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::{MemoryStore, Session};

    use super::*;

    #[tokio::test]
    async fn test_memory_storage_read_write_clear() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.read(keys::TOKEN).await.unwrap(), None);

        storage.write(keys::TOKEN, "abc".to_string()).await.unwrap();
        storage.write(keys::TOKEN, "def".to_string()).await.unwrap();
        assert_eq!(storage.read(keys::TOKEN).await.unwrap().as_deref(), Some("def"));
        assert_eq!(storage.len().await, 1);

        storage.clear().await.unwrap();
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_tower_session_clear_keeps_other_entries() {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        session.insert("flash", vec!["hello"]).await.unwrap();

        SessionStorage::write(&session, keys::TOKEN, "abc".to_string())
            .await
            .unwrap();
        SessionStorage::write(&session, keys::USER, "{}".to_string())
            .await
            .unwrap();
        SessionStorage::clear(&session).await.unwrap();

        assert_eq!(SessionStorage::read(&session, keys::TOKEN).await.unwrap(), None);
        assert_eq!(SessionStorage::read(&session, keys::USER).await.unwrap(), None);
        assert!(session.get::<Vec<String>>("flash").await.unwrap().is_some());
    }
}
