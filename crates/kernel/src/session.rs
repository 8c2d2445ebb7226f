//! Session context shared by the HTTP client and every view.
//!
//! The token and user live in memory for the lifetime of the process. The
//! token alone is mirrored into a [`KeyValueStore`] so it survives restarts.

use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::settings::SessionSettings;
use crate::store::{self, KeyValueStore};

/// Identity returned by the backend on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Default)]
struct SessionState {
    token: Option<String>,
    user: Option<User>,
}

pub struct Session {
    store: Arc<dyn KeyValueStore>,
    token_key: String,
    state: RwLock<SessionState>,
}

impl Session {
    /// Build a session over `store`, picking up a previously persisted token.
    pub fn restore(store: Arc<dyn KeyValueStore>, token_key: impl Into<String>) -> store::Result<Self> {
        let token_key = token_key.into();
        let token = store.get(&token_key)?;
        if token.is_some() {
            tracing::debug!(key = %token_key, "restored persisted access token");
        }
        Ok(Self {
            store,
            token_key,
            state: RwLock::new(SessionState { token, user: None }),
        })
    }

    /// Open the store described by `settings` and restore from it.
    pub fn open(settings: &SessionSettings) -> store::Result<Self> {
        let store: Arc<dyn KeyValueStore> = match settings.resolved_store_path() {
            Some(path) => Arc::new(store::FileStore::open(path)?),
            None => {
                tracing::warn!("no data directory available; session will not persist");
                Arc::new(store::MemoryStore::new())
            }
        };
        Self::restore(store, settings.token_key.clone())
    }

    /// A session with nothing persisted behind it.
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(store::MemoryStore::new()),
            token_key: "ACCESS_TOKEN".to_string(),
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Store a freshly issued token in memory and in the persistent store.
    pub fn set_token(&self, token: impl Into<String>) -> store::Result<()> {
        let token = token.into();
        self.store.set(&self.token_key, &token)?;
        self.write().token = Some(token);
        Ok(())
    }

    pub fn set_user(&self, user: Option<User>) {
        self.write().user = user;
    }

    /// Drop the token. The in-memory copy is cleared even if the store fails.
    pub fn clear_token(&self) -> store::Result<()> {
        self.write().token = None;
        self.store.remove(&self.token_key)
    }

    /// Forget both token and user.
    pub fn sign_out(&self) -> store::Result<()> {
        self.write().user = None;
        self.clear_token()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("Session")
            .field("token_key", &self.token_key)
            .field("authenticated", &state.token.is_some())
            .field("user", &state.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn alice() -> User {
        User {
            id: 7,
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn restore_picks_up_persisted_token() {
        let store = Arc::new(MemoryStore::new());
        store.set("ACCESS_TOKEN", "persisted").unwrap();

        let session = Session::restore(store, "ACCESS_TOKEN").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("persisted"));
        assert_eq!(session.user(), None);
    }

    #[test]
    fn set_token_mirrors_into_store() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::restore(store.clone(), "ACCESS_TOKEN").unwrap();
        assert!(!session.is_authenticated());

        session.set_token("fresh").unwrap();
        assert_eq!(store.get("ACCESS_TOKEN").unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn clear_token_keeps_user() {
        let store = Arc::new(MemoryStore::new());
        let session = Session::restore(store.clone(), "ACCESS_TOKEN").unwrap();
        session.set_token("t").unwrap();
        session.set_user(Some(alice()));

        session.clear_token().unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(store.get("ACCESS_TOKEN").unwrap(), None);
        assert_eq!(session.user(), Some(alice()));
    }

    #[test]
    fn sign_out_forgets_everything() {
        let session = Session::in_memory();
        session.set_token("t").unwrap();
        session.set_user(Some(alice()));

        session.sign_out().unwrap();
        assert_eq!(session.token(), None);
        assert_eq!(session.user(), None);
    }

    #[test]
    fn open_uses_configured_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = SessionSettings {
            store_path: Some(dir.path().join("session.json")),
            ..SessionSettings::default()
        };

        Session::open(&settings).unwrap().set_token("kept").unwrap();
        let reopened = Session::open(&settings).unwrap();
        assert_eq!(reopened.token().as_deref(), Some("kept"));
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session::in_memory();
        session.set_token("secret-token").unwrap();
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("authenticated: true"));
    }
}
