//! Client-side durable state for the card-creation wizard.
//!
//! - [`kv`]: the [`KeyValueStore`] trait and its memory, file and browser backends
//! - [`draft`]: typed views ([`Draft`], [`Session`]) over the fixed cache keys
//! - [`resolve`]: reconciling navigation payload, cache and inferred ids
//! - [`wizard`]: step order, navigation payload and cache-writing transitions

pub mod draft;
pub mod kv;
pub mod models;
pub mod resolve;
pub mod wizard;

mod memory;
pub use memory::MemoryStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store;
#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

#[cfg(all(target_arch = "wasm32", feature = "web"))]
mod local_storage;
#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub use local_storage::LocalStorageStore;

pub use draft::{keys, Draft, Session};
pub use kv::KeyValueStore;
pub use models::{CardTarget, CardType, HexColor, Palette, ParseError};
pub use resolve::{resolve_id, resolve_target, IdSource, Resolved};
pub use wizard::{Wizard, WizardError, WizardNav, WizardStep};
