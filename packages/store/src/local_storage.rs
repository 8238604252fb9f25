//! # Browser `localStorage` store
//!
//! [`LocalStorageStore`] is the [`KeyValueStore`] used on the **web platform**.
//! It writes straight into `window.localStorage`, so wizard selections and the
//! auth token survive reloads and are shared by every tab of the origin.
//!
//! When a namespace is given every key is prefixed with `"<namespace>:"`,
//! which keeps two signed-in users on the same browser apart.
//!
//! Storage can be unavailable (private mode, disabled by policy, quota
//! exceeded). All methods then silently degrade: reads return `None`, writes
//! are dropped.

use web_sys::Storage;

use crate::kv::KeyValueStore;

/// localStorage-backed KeyValueStore for the web platform.
#[derive(Clone, Debug, Default)]
pub struct LocalStorageStore {
    prefix: Option<String>,
}

impl LocalStorageStore {
    /// Unprefixed store.
    pub fn new() -> Self {
        Self::with_namespace(None)
    }

    /// Store whose keys are prefixed with `"<namespace>:"`.
    pub fn with_namespace(namespace: Option<&str>) -> Self {
        Self {
            prefix: namespace.map(|ns| format!("{ns}:")),
        }
    }

    fn storage(&self) -> Option<Storage> {
        web_sys::window()?.local_storage().ok()?
    }

    fn full_key(&self, key: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{key}"),
            None => key.to_string(),
        }
    }
}

impl KeyValueStore for LocalStorageStore {
    async fn get(&self, key: &str) -> Option<String> {
        self.storage()?.get_item(&self.full_key(key)).ok()?
    }

    async fn set(&self, key: &str, value: String) {
        if let Some(storage) = self.storage() {
            let _ = storage.set_item(&self.full_key(key), &value);
        }
    }

    async fn remove(&self, key: &str) {
        if let Some(storage) = self.storage() {
            let _ = storage.remove_item(&self.full_key(key));
        }
    }
}
