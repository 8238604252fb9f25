//! Data models shared by the server and the UI.

mod card;
mod contact;
mod team;
mod template;
mod user;

use serde::{Deserialize, Serialize};

pub use card::{CardInput, CardSummary, CardView, StyleInput};
pub use contact::{ContactView, SaveContactRequest};
pub use team::{
    MemberCardView, MemberInput, MemberView, MembersUpload, TeamInput, TeamSummary, TeamView,
};
pub use template::{TemplateInfo, TemplateKind};
pub use user::{
    normalize_email, AuthResponse, LoginRequest, SignupRequest, UserInfo, VerificationStatus,
};

/// Rejection of a request body before it reaches storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
    #[error("{0} must be at most {1} characters")]
    TooLong(&'static str, usize),
    #[error("at most {1} {0} are allowed")]
    TooMany(&'static str, usize),
    #[error("password must be at least {0} characters")]
    PasswordTooShort(usize),
    #[error("invalid email address")]
    InvalidEmail,
    #[error("row {0}: {1}")]
    Row(usize, Box<ValidationError>),
}

/// JSON body of every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Trim, and map blank strings to `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
