//! Session persistence.
//!
//! A session is the bearer token plus the user it belongs to. The two are
//! kept in one document so every store and clear touches both: there is no
//! state where a token exists without its user after a completed operation.
//!
//! The store is injected into [`ApiClient`](crate::ApiClient) rather than
//! read from ambient process state, so the client is testable against
//! [`MemorySessionStore`] without touching disk.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::ApiError;

/// The authenticated user, as returned by the auth endpoints. The backend
/// owns the id shape (numeric today, opaque tomorrow), so it stays a JSON
/// value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionUser {
    pub id: serde_json::Value,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// A logged-in session: bearer token + user, always together.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Durable storage for the session.
pub trait SessionStore: Send + Sync {
    /// Read the current session, if any.
    fn load(&self) -> Result<Option<Session>, ApiError>;
    /// Persist a session, replacing any previous one.
    fn store(&self, session: &Session) -> Result<(), ApiError>;
    /// Remove the session. Idempotent.
    fn clear(&self) -> Result<(), ApiError>;
}

/// File-backed store under `~/.skald/session.json`.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at the default location in the user's home directory.
    pub fn new() -> Result<Self, ApiError> {
        let home = dirs::home_dir()
            .ok_or_else(|| ApiError::Session("could not find home directory".to_string()))?;
        Ok(Self {
            path: home.join(".skald").join("session.json"),
        })
    }

    /// Store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, ApiError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&content)?;
        Ok(Some(session))
    }

    fn store(&self, session: &Session) -> Result<(), ApiError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(session)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and embedding.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start out already logged in.
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, ApiError> {
        Ok(self
            .session
            .lock()
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))?
            .clone())
    }

    fn store(&self, session: &Session) -> Result<(), ApiError> {
        *self
            .session
            .lock()
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))? =
            Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self
            .session
            .lock()
            .map_err(|_| ApiError::Session("session lock poisoned".to_string()))? = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Session {
        Session {
            token: "tok-123".to_string(),
            user: SessionUser {
                id: serde_json::json!(42),
                name: "Asta".to_string(),
                email: "asta@example.com".to_string(),
            },
        }
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path().join("session.json"));

        assert!(store.load().unwrap().is_none());
        store.store(&sample()).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.token, "tok-123");
        assert_eq!(loaded.user.email, "asta@example.com");
    }

    #[test]
    fn test_clear_removes_token_and_user_together() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::at(dir.path().join("session.json"));

        store.store(&sample()).unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Idempotent on an already-empty store.
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySessionStore::new();
        store.store(&sample()).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), sample());
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
