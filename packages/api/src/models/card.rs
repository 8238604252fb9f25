//! Personal card payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::HexColor;

use super::{normalize_optional, ValidationError};
use crate::models::user::normalize_email;

/// Body of `POST /api/cards` and `PUT /api/cards/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardInput {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub template_id: Option<i32>,
    #[serde(default)]
    pub primary_color: Option<HexColor>,
    #[serde(default)]
    pub secondary_color: Option<HexColor>,
}

impl CardInput {
    pub const MAX_FIELD_LEN: usize = 200;
    pub const MAX_BIO_LEN: usize = 1000;

    /// Trim every text field, turn blanks into `None`, and check lengths.
    pub fn normalize(self) -> Result<Self, ValidationError> {
        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(ValidationError::Required("full_name"));
        }
        if full_name.chars().count() > Self::MAX_FIELD_LEN {
            return Err(ValidationError::TooLong("full_name", Self::MAX_FIELD_LEN));
        }

        let email = match normalize_optional(self.email) {
            Some(e) => Some(normalize_email(&e)?),
            None => None,
        };

        let limit = |field: &'static str, value: Option<String>, max: usize| {
            let value = normalize_optional(value);
            match &value {
                Some(v) if v.chars().count() > max => Err(ValidationError::TooLong(field, max)),
                _ => Ok(value),
            }
        };

        Ok(Self {
            full_name,
            email,
            phone: limit("phone", self.phone, Self::MAX_FIELD_LEN)?,
            job_title: limit("job_title", self.job_title, Self::MAX_FIELD_LEN)?,
            company_name: limit("company_name", self.company_name, Self::MAX_FIELD_LEN)?,
            company_website: limit("company_website", self.company_website, Self::MAX_FIELD_LEN)?,
            address: limit("address", self.address, Self::MAX_FIELD_LEN)?,
            bio: limit("bio", self.bio, Self::MAX_BIO_LEN)?,
            template_id: self.template_id,
            primary_color: self.primary_color,
            secondary_color: self.secondary_color,
        })
    }
}

/// Body of `PATCH .../style`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleInput {
    #[serde(default)]
    pub primary_color: Option<HexColor>,
    #[serde(default)]
    pub secondary_color: Option<HexColor>,
    #[serde(default)]
    pub template_id: Option<i32>,
}

impl StyleInput {
    pub fn is_empty(&self) -> bool {
        self.primary_color.is_none() && self.secondary_color.is_none() && self.template_id.is_none()
    }
}

/// A personal card as returned to clients. Images are `data:` URIs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardView {
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
    pub primary_color: Option<HexColor>,
    pub secondary_color: Option<HexColor>,
    pub logo: Option<String>,
    pub profile_photo: Option<String>,
    pub qr_url: Option<String>,
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CardView {
    /// The editable fields, as they would be submitted again.
    pub fn to_input(&self) -> CardInput {
        CardInput {
            full_name: self.full_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            job_title: self.job_title.clone(),
            company_name: self.company_name.clone(),
            company_website: self.company_website.clone(),
            address: self.address.clone(),
            bio: self.bio.clone(),
            template_id: self.template_id,
            primary_color: self.primary_color.clone(),
            secondary_color: self.secondary_color.clone(),
        }
    }

    pub fn palette(&self) -> store::Palette {
        store::Palette::from_parts(self.primary_color.clone(), self.secondary_color.clone())
    }
}

/// Row of the "my cards" list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CardSummary {
    pub id: i64,
    pub full_name: String,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub template_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}
