//! Saved contacts: cards another user kept in their address book.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::CardView;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SaveContactRequest {
    pub card_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContactView {
    pub id: i64,
    pub saved_at: DateTime<Utc>,
    pub card: CardView,
}
