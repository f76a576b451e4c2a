use std::rc::Rc;

use client::ports::StorageError;
use client::{KeyValueStore, MemoryStore};
use log::warn;
use web_sys::Storage;

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    pub fn open() -> Option<Self> {
        let storage = web_sys::window()?.local_storage().ok()??;
        Some(Self { storage })
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage
            .set_item(key, value)
            .map_err(|e| StorageError::Write {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }

    fn remove(&self, key: &str) {
        if let Err(e) = self.storage.remove_item(key) {
            warn!("could not remove {} from localStorage: {:?}", key, e);
        }
    }
}

/// `localStorage` when the browser allows it (private windows may not),
/// otherwise an in-memory store that lives as long as the page.
pub fn session_storage() -> Rc<dyn KeyValueStore> {
    match LocalStorage::open() {
        Some(storage) => Rc::new(storage),
        None => {
            warn!("localStorage unavailable, session will not survive a reload");
            Rc::new(MemoryStore::new())
        }
    }
}
