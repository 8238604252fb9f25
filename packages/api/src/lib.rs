//! # api: wire types and HTTP client for CardForge
//!
//! Shared by the axum backend (`server`) and the Dioxus frontend (`ui`), so
//! both sides serialize the exact same structs.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Request bodies with their `normalize` validation, response views, [`models::ErrorBody`] |
//! | [`vcard`] | vCard 3.0 export of a card |
//! | [`client`] | [`ApiClient`], one async method per endpoint |

pub mod client;
pub mod models;
pub mod vcard;

pub use client::{ApiClient, ClientError, Upload};
pub use models::*;
