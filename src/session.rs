//! Signed-in session and its persistence port.
//!
//! The session is an explicit value handed to the views that need it, never
//! a global. Persistence goes through the `SessionStore` trait so the app
//! decides at startup where (or whether) the session survives restarts:
//! load-on-init, save-on-change, clear-on-logout.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::api::models::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// On-disk format, versioned so a future shape change can migrate.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    version: u32,
    session: Session,
}

/// Session persisted as JSON under the user data directory.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rfx-portal")
            .join("session.json")
    }
}

impl SessionStore for JsonFileStore {
    fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            tracing::debug!("no session file, starting signed out");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).context("Failed to read session file")?;
        let file: SessionFile =
            serde_json::from_str(&content).context("Failed to parse session file")?;

        tracing::info!("Restored session for {}", file.session.user.username);
        Ok(Some(file.session))
    }

    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create session directory")?;
        }

        let file = SessionFile {
            version: 1,
            session: session.clone(),
        };
        let content =
            serde_json::to_string_pretty(&file).context("Failed to serialize session")?;
        fs::write(&self.path, content).context("Failed to write session file")?;

        tracing::debug!("Saved session for {}", session.user.username);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }
}

/// In-memory store for tests and `--fresh` runs.
#[derive(Default)]
pub struct MemoryStore {
    session: std::cell::RefCell<Option<Session>>,
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.session.borrow().clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.session.borrow_mut() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.session.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::UserType;

    fn session() -> Session {
        Session {
            user: User {
                id: 3,
                username: "acme-sales".into(),
                email: "sales@acme.test".into(),
                user_type: UserType::Supplier,
                company: None,
            },
            token: "token-123".into(),
        }
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("session.json"));

        assert!(store.load().unwrap().is_none());

        store.save(&session()).unwrap();
        let restored = store.load().unwrap().expect("session should persist");
        assert_eq!(restored.user.username, "acme-sales");
        assert_eq!(restored.token, "token-123");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn clear_without_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("missing.json"));
        store.clear().unwrap();
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::default();
        store.save(&session()).unwrap();
        assert!(store.load().unwrap().is_some());
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
