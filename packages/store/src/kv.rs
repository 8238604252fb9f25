//! # Key/value store abstraction
//!
//! Every piece of client-side state that must survive a page reload (the auth
//! token, the display name and the in-progress wizard selections) lives in a
//! [`KeyValueStore`]. Keys and values are plain strings, which lets the
//! browser's `localStorage` back it directly.
//!
//! Implementations live in sibling modules:
//!
//! | Backend | Module | Used by |
//! |---------|--------|---------|
//! | [`crate::MemoryStore`] | `memory` | tests, native builds without a data dir |
//! | [`crate::FileStore`] | `file_store` | native builds |
//! | `LocalStorageStore` | `local_storage` | the browser (WASM + `web` feature) |
//!
//! Backends never fail loudly: a read that cannot be served returns `None` and a
//! write that cannot be performed is dropped. An unavailable store degrades to
//! "nothing cached", which the wizard already has to handle.

use std::future::Future;

/// Async string key/value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> impl Future<Output = Option<String>>;
    fn set(&self, key: &str, value: String) -> impl Future<Output = ()>;
    fn remove(&self, key: &str) -> impl Future<Output = ()>;
}
