//! # Persistence
//!
//! [`Repository`] is the seam between the HTTP handlers and storage. Two
//! implementations share its semantics:
//!
//! - [`PgRepository`]: PostgreSQL through `sqlx`, schema in `migrations/`
//! - [`MemoryRepository`]: a mutex-guarded in-process copy, used by the router
//!   tests and by `--memory` dev runs
//!
//! Records are the stored rows. Images stay as raw bytes plus media type here
//! and only become `data:` URIs when a record is turned into an API view.

mod memory;
mod pg;

use std::future::Future;

use api::{CardInput, MemberInput, StyleInput, TeamInput, TemplateInfo};
use chrono::{DateTime, Utc};

pub use memory::MemoryRepository;
pub use pg::PgRepository;

use crate::images::Image;
use crate::qr::{QrCode, QrError, QrFactory};

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("row already exists")]
    Conflict,
    #[error(transparent)]
    Qr(#[from] QrError),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub email_verified: bool,
    pub verification_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub verification_token: String,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct CardRecord {
    pub id: i64,
    pub user_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub company_website: Option<String>,
    pub address: Option<String>,
    pub bio: Option<String>,
    pub template_id: Option<i32>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo: Option<Vec<u8>>,
    pub logo_mime: Option<String>,
    pub profile_photo: Option<Vec<u8>>,
    pub profile_photo_mime: Option<String>,
    pub qr_url: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TeamRecord {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub template_id: Option<i32>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub logo: Option<Vec<u8>>,
    pub logo_mime: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct TeamCount {
    pub id: i64,
    pub company_name: String,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct MemberRecord {
    pub id: i64,
    pub team_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub qr_url: Option<String>,
    pub qr_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ContactRecord {
    pub id: i64,
    pub user_id: i64,
    pub card_id: i64,
    pub saved_at: DateTime<Utc>,
}

/// Which image column of a card an upload goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardImage {
    Logo,
    ProfilePhoto,
}

/// Storage operations used by the handlers. `Option`/`bool` results report a
/// missing row; [`DbError::Conflict`] reports a uniqueness violation.
pub trait Repository: Clone + Send + Sync + 'static {
    // users
    fn create_user(&self, user: NewUser) -> impl Future<Output = Result<UserRecord, DbError>> + Send;
    fn user_by_id(&self, id: i64) -> impl Future<Output = Result<Option<UserRecord>, DbError>> + Send;
    fn user_by_email(&self, email: &str) -> impl Future<Output = Result<Option<UserRecord>, DbError>> + Send;
    /// Mark the holder of `token` verified and consume the token.
    fn verify_email(&self, token: &str) -> impl Future<Output = Result<Option<UserRecord>, DbError>> + Send;

    // templates
    fn templates(&self) -> impl Future<Output = Result<Vec<TemplateInfo>, DbError>> + Send;
    fn template(&self, id: i32) -> impl Future<Output = Result<Option<TemplateInfo>, DbError>> + Send;

    // cards
    fn create_card(&self, user_id: i64, input: &CardInput) -> impl Future<Output = Result<CardRecord, DbError>> + Send;
    fn card(&self, id: i64) -> impl Future<Output = Result<Option<CardRecord>, DbError>> + Send;
    fn cards_for_user(&self, user_id: i64) -> impl Future<Output = Result<Vec<CardRecord>, DbError>> + Send;
    fn update_card(&self, id: i64, input: &CardInput) -> impl Future<Output = Result<Option<CardRecord>, DbError>> + Send;
    fn update_card_style(&self, id: i64, style: &StyleInput) -> impl Future<Output = Result<Option<CardRecord>, DbError>> + Send;
    fn set_card_image(&self, id: i64, slot: CardImage, image: Image) -> impl Future<Output = Result<Option<CardRecord>, DbError>> + Send;
    fn set_card_qr(&self, id: i64, qr: QrCode) -> impl Future<Output = Result<Option<CardRecord>, DbError>> + Send;
    fn delete_card(&self, id: i64) -> impl Future<Output = Result<bool, DbError>> + Send;

    // teams
    fn create_team(&self, user_id: i64, input: &TeamInput) -> impl Future<Output = Result<TeamRecord, DbError>> + Send;
    fn team(&self, id: i64) -> impl Future<Output = Result<Option<TeamRecord>, DbError>> + Send;
    fn teams_for_user(&self, user_id: i64) -> impl Future<Output = Result<Vec<TeamCount>, DbError>> + Send;
    fn update_team(&self, id: i64, input: &TeamInput) -> impl Future<Output = Result<Option<TeamRecord>, DbError>> + Send;
    fn update_team_style(&self, id: i64, style: &StyleInput) -> impl Future<Output = Result<Option<TeamRecord>, DbError>> + Send;
    fn set_team_logo(&self, id: i64, image: Image) -> impl Future<Output = Result<Option<TeamRecord>, DbError>> + Send;
    /// Members first, then the team, all or nothing.
    fn delete_team(&self, id: i64) -> impl Future<Output = Result<bool, DbError>> + Send;

    // members
    fn members(&self, team_id: i64) -> impl Future<Output = Result<Vec<MemberRecord>, DbError>> + Send;
    fn member(&self, team_id: i64, member_id: i64) -> impl Future<Output = Result<Option<MemberRecord>, DbError>> + Send;
    /// Swap the whole member list and give every new row its own QR code,
    /// in one transaction.
    fn replace_members(
        &self,
        team_id: i64,
        members: Vec<MemberInput>,
        qr: &QrFactory,
    ) -> impl Future<Output = Result<Vec<MemberRecord>, DbError>> + Send;
    fn set_member_qr(&self, member_id: i64, qr: QrCode) -> impl Future<Output = Result<Option<MemberRecord>, DbError>> + Send;

    // contacts
    /// Newest first, with the saved card.
    fn contacts_for_user(&self, user_id: i64) -> impl Future<Output = Result<Vec<(ContactRecord, CardRecord)>, DbError>> + Send;
    fn save_contact(&self, user_id: i64, card_id: i64) -> impl Future<Output = Result<ContactRecord, DbError>> + Send;
    fn delete_contact(&self, user_id: i64, card_id: i64) -> impl Future<Output = Result<bool, DbError>> + Send;
}
