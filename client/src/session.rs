//! Session store: the auth token and cached user profile.
//!
//! Both live in durable storage under two fixed keys. Token validity is
//! decided by the server; this store never expires or refreshes anything.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use common::model::user::User;
use log::{debug, warn};

use crate::ports::{KeyValueStore, StorageError};

pub const TOKEN_KEY: &str = "auth_token";
pub const USER_KEY: &str = "auth_user";

/// Cloneable handle over the session kept in a [`KeyValueStore`].
///
/// Every clone shares the same storage, so a logout through one handle is
/// seen by all API clients holding another.
#[derive(Clone)]
pub struct SessionStore {
    storage: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    pub fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)
    }

    /// The stored token; an empty string counts as no token.
    pub fn get_token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let raw = serde_json::to_string(user).map_err(|e| StorageError::Serialize {
            key: USER_KEY.to_string(),
            reason: e.to_string(),
        })?;
        self.storage.set(USER_KEY, &raw)
    }

    pub fn get_user(&self) -> Option<User> {
        let raw = self.storage.get(USER_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("ignoring unreadable cached user record: {}", e);
                None
            }
        }
    }

    pub fn get_user_id(&self) -> Option<i64> {
        self.get_user().map(|u| u.id)
    }

    pub fn clear_user(&self) {
        self.storage.remove(USER_KEY);
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// Drops token and user together.
    pub fn logout(&self) {
        self.storage.remove(TOKEN_KEY);
        self.storage.remove(USER_KEY);
        debug!("session cleared");
    }

    /// First letter of the username, upper-cased, for the avatar badge.
    pub fn user_initial(&self) -> String {
        self.get_user()
            .and_then(|u| u.username.chars().next())
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_else(|| "U".to_string())
    }
}

/// Non-durable [`KeyValueStore`] used in tests and when the browser refuses
/// access to `localStorage` (private mode, disabled storage).
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}
