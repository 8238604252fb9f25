//! # Filesystem-backed key/value store
//!
//! [`FileStore`] is a [`KeyValueStore`] implementation that persists each key as
//! one small file. It is used by native builds so an interrupted wizard can be
//! resumed after the app restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! └── kv/
//!     ├── token
//!     ├── cardType
//!     └── cardId
//! ```
//!
//! Key names are mapped to file names by replacing every character outside
//! `[A-Za-z0-9_-]` with `_`, so a key can never escape the `kv/` directory.

use std::path::{Path, PathBuf};

use crate::kv::KeyValueStore;

/// Filesystem-backed KeyValueStore for native persistence.
#[derive(Clone, Debug)]
pub struct FileStore {
    base: PathBuf,
}

impl FileStore {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    /// Store scoped to an optional namespace (`<base>/<namespace>/kv/`).
    pub fn with_namespace(base: &Path, namespace: Option<&str>) -> Self {
        match namespace {
            Some(ns) => Self::new(base.join(file_name(ns))),
            None => Self::new(base.to_path_buf()),
        }
    }

    fn kv_dir(&self) -> PathBuf {
        self.base.join("kv")
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.kv_dir().join(file_name(key))
    }
}

fn file_name(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.key_path(key)).ok()
    }

    async fn set(&self, key: &str, value: String) {
        let _ = std::fs::create_dir_all(self.kv_dir());
        let _ = std::fs::write(self.key_path(key), value);
    }

    async fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.key_path(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "cardforge_store_{}_{}",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = temp_dir("reopen");

        let store = FileStore::new(dir.clone());
        store.set("cardId", "17".to_string()).await;
        store.set("primaryColor", "#112233".to_string()).await;

        let reopened = FileStore::new(dir.clone());
        assert_eq!(reopened.get("cardId").await.as_deref(), Some("17"));
        assert_eq!(reopened.get("primaryColor").await.as_deref(), Some("#112233"));

        reopened.remove("cardId").await;
        assert!(store.get("cardId").await.is_none());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_keys_cannot_escape_directory() {
        let dir = temp_dir("escape");
        let store = FileStore::new(dir.clone());

        store.set("../outside", "x".to_string()).await;
        assert!(dir.join("kv").join(".._outside").exists());
        assert!(!dir.join("outside").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_namespaced_stores_are_isolated() {
        let dir = temp_dir("ns");
        let alice = FileStore::with_namespace(&dir, Some("7"));
        let anonymous = FileStore::with_namespace(&dir, None);

        alice.set("cardType", "team".to_string()).await;
        assert!(anonymous.get("cardType").await.is_none());
        assert_eq!(alice.get("cardType").await.as_deref(), Some("team"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
