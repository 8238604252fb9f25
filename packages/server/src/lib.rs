//! # server: HTTP backend for CardForge
//!
//! An axum service exposing accounts, personal cards, team cards, templates
//! and saved contacts under `/api`. Storage sits behind
//! [`db::Repository`], so the same router runs on PostgreSQL in production and
//! on [`db::MemoryRepository`] in tests.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`settings`] | Layered configuration (`config.toml`, `CARDFORGE_*`) |
//! | [`database`] | Connection pool and migrations |
//! | [`db`] | Repository trait, Postgres and in-memory implementations |
//! | [`auth`] | Argon2 passwords, JWT bearer tokens, the [`auth::AuthUser`] extractor |
//! | [`qr`] | QR payloads for cards and team members |
//! | [`images`] | Upload sniffing and `data:` URIs |
//! | [`render`] | SVG export of a card face |
//! | [`application`] | Router assembly and launch |

pub mod application;
pub mod auth;
pub mod database;
pub mod db;
pub mod error;
pub mod images;
pub mod qr;
pub mod render;
pub mod settings;
pub mod views;

mod routes;

pub use application::{api_router, build_router, init_tracing, launch, serve, AppState};
pub use settings::Settings;
