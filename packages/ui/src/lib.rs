//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;

pub const APP_CSS: Asset = asset!("/assets/app.css");

mod storage;
pub use storage::{api_base, cache_store, make_client, make_session, make_wizard, CacheStore};

pub mod links;

mod navbar;
pub use navbar::Navbar;

mod auth;
pub use auth::{sign_in, use_auth, AuthProvider, AuthState, LogoutButton, SignInPrompt};

mod card_face;
pub use card_face::{kind_for, CardFace, FaceData};

mod card_form;
pub use card_form::CardFields;

mod upload;

pub mod wizard;
pub use wizard::{
    CardTypeStep, ColorRole, ColorStep, InfoStep, LogoStep, PreviewStep, TemplateStep,
    WizardProvider,
};

pub mod pages;
