//! Shared cache and client constructors for all platforms.
//!
//! Returns the [`store::KeyValueStore`] the wizard and session live in:
//! - **Web** (WASM + `web` feature): `localStorage` via [`store::LocalStorageStore`]
//! - **Desktop / Mobile** (native): filesystem via [`store::FileStore`]
//! - anything else: a process-local [`store::MemoryStore`]

use api::ApiClient;
use store::{Session, Wizard};

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub type CacheStore = store::LocalStorageStore;
#[cfg(not(target_arch = "wasm32"))]
pub type CacheStore = store::FileStore;
#[cfg(all(target_arch = "wasm32", not(feature = "web")))]
pub type CacheStore = store::MemoryStore;

/// Create the platform-appropriate durable cache.
pub fn cache_store() -> CacheStore {
    #[cfg(all(target_arch = "wasm32", feature = "web"))]
    {
        store::LocalStorageStore::new()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let base = dirs::data_dir()
            .unwrap_or_else(|| std::path::PathBuf::from("."))
            .join("cardforge");
        store::FileStore::new(base)
    }
    #[cfg(all(target_arch = "wasm32", not(feature = "web")))]
    {
        store::MemoryStore::new()
    }
}

pub fn make_wizard() -> Wizard<CacheStore> {
    Wizard::new(cache_store())
}

pub fn make_session() -> Session<CacheStore> {
    Session::new(cache_store())
}

/// Origin the API is served from. The browser build talks to its own origin;
/// native builds read `CARDFORGE_API_URL`.
pub fn api_base() -> String {
    #[cfg(target_arch = "wasm32")]
    {
        web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        std::env::var("CARDFORGE_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
    }
}

pub fn make_client(token: Option<String>) -> ApiClient {
    ApiClient::new(api_base()).with_token(token)
}

/// Wait between polls.
pub async fn sleep_secs(secs: u64) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(std::time::Duration::from_secs(secs)).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(std::time::Duration::from_secs(secs)).await;
}
