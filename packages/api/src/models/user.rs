//! # User and authentication payloads
//!
//! [`UserInfo`] is the client-safe projection of a user row: it never carries the
//! password hash or the verification token. The helper [`UserInfo::display_name`]
//! returns the user's name or falls back to their email address; the UI caches
//! that string under the `userName` key.
//!
//! The request types mirror the two forms of the auth screens, and
//! [`AuthResponse`] is what both signup and login return: a bearer token plus
//! the user it was issued for.

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
}

impl UserInfo {
    /// Get display name, falling back to email if name is empty.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub const MIN_PASSWORD_LEN: usize = 8;

    /// Trim name, lower-case email, and check the basic shape of each field.
    pub fn normalize(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        let email = normalize_email(&self.email)?;

        if name.is_empty() {
            return Err(ValidationError::Required("name"));
        }
        if self.password.len() < Self::MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(Self::MIN_PASSWORD_LEN));
        }

        Ok(Self {
            name,
            email,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by signup and login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

/// Answer to the verification poll.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct VerificationStatus {
    pub verified: bool,
}

/// Lower-case and trim an email, rejecting anything without a local part and a domain.
pub fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ValidationError::InvalidEmail),
    }
}
