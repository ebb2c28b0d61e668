//! Session file for the terminal client.
//!
//! Entries live in one JSON object in `session.json` under the myFlix home
//! directory. Every write rewrites the whole file while holding the lock.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use myflix_web::config::ConfigError;
use myflix_web::session::{SessionError, SessionStorage, keys};
use tokio::sync::Mutex;

const SESSION_FILE: &str = "session.json";

/// Resolve the myFlix home directory.
///
/// `MYFLIX_HOME` wins; otherwise `$HOME/.config/myflix`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if neither variable is set.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    if let Some(home) = std::env::var_os("MYFLIX_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    let home = std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar("HOME".to_string()))?;
    Ok(PathBuf::from(home).join(".config").join("myflix"))
}

/// Session storage backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileStorage {
    /// Storage for `session.json` inside `dir`. Nothing is created until
    /// the first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Storage under [`home_dir`].
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be resolved.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(home_dir()?))
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry. A file that is not a JSON object reads as empty
    /// so logging out or in again replaces it.
    async fn load(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                tracing::warn!(error = %e, path = %self.path.display(), "Discarding unreadable session file");
                BTreeMap::new()
            })),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(entries)?).await?;

        // The file holds a bearer token.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .await?;
        }
        Ok(())
    }

    async fn remove_file(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl SessionStorage for FileStorage {
    async fn read(&self, key: &'static str) -> Result<Option<String>, SessionError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn write(&self, key: &'static str, value: String) -> Result<(), SessionError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value);
        self.save(&entries).await
    }

    async fn clear(&self) -> Result<(), SessionError> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load().await?;
        for key in keys::ALL {
            entries.remove(key);
        }
        if entries.is_empty() {
            self.remove_file().await
        } else {
            self.save(&entries).await
        }
    }
}
