//! Team card and team member payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use store::HexColor;

use super::{normalize_optional, ValidationError};
use crate::models::user::normalize_email;

/// Body of `POST /api/teams` and `PUT /api/teams/:id`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamInput {
    pub company_name: String,
    #[serde(default)]
    pub template_id: Option<i32>,
    #[serde(default)]
    pub primary_color: Option<HexColor>,
    #[serde(default)]
    pub secondary_color: Option<HexColor>,
}

impl TeamInput {
    pub fn normalize(self) -> Result<Self, ValidationError> {
        let company_name = self.company_name.trim().to_string();
        if company_name.is_empty() {
            return Err(ValidationError::Required("company_name"));
        }
        Ok(Self {
            company_name,
            ..self
        })
    }
}

/// One member in a bulk upload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MemberInput {
    pub full_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
}

impl MemberInput {
    pub fn normalize(self) -> Result<Self, ValidationError> {
        let full_name = self.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(ValidationError::Required("full_name"));
        }
        let email = match normalize_optional(self.email) {
            Some(e) => Some(normalize_email(&e)?),
            None => None,
        };
        Ok(Self {
            full_name,
            email,
            phone: normalize_optional(self.phone),
            job_title: normalize_optional(self.job_title),
        })
    }
}

/// Body of `PUT /api/teams/:id/members`: the complete new member list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MembersUpload {
    pub members: Vec<MemberInput>,
}

impl MembersUpload {
    pub const MAX_MEMBERS: usize = 500;

    /// Normalize every member; the first bad row is reported with its 1-based position.
    pub fn normalize(self) -> Result<Self, ValidationError> {
        if self.members.len() > Self::MAX_MEMBERS {
            return Err(ValidationError::TooMany("members", Self::MAX_MEMBERS));
        }
        let members = self
            .members
            .into_iter()
            .enumerate()
            .map(|(i, m)| {
                m.normalize()
                    .map_err(|e| ValidationError::Row(i + 1, Box::new(e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { members })
    }

    /// Parse pasted spreadsheet text: one member per line,
    /// `name,email,phone,title`. Blank lines and a leading header row
    /// (first cell `name` or `full_name`) are skipped.
    pub fn from_lines(text: &str) -> Self {
        let members = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .filter(|(i, line)| {
                let first = line.split(',').next().unwrap_or("").trim().to_lowercase();
                !(*i == 0 && (first == "name" || first == "full_name"))
            })
            .map(|(_, line)| {
                let mut cells = line.split(',').map(|c| c.trim().to_string());
                let cell = |c: Option<String>| c.filter(|v| !v.is_empty());
                MemberInput {
                    full_name: cells.next().unwrap_or_default(),
                    email: cell(cells.next()),
                    phone: cell(cells.next()),
                    job_title: cell(cells.next()),
                }
            })
            .collect();
        Self { members }
    }
}

/// A team member as returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberView {
    pub id: i64,
    pub team_id: i64,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub job_title: Option<String>,
    pub qr_url: Option<String>,
    pub qr_code: Option<String>,
}

/// A team with its branding and members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamView {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub template_id: Option<i32>,
    pub primary_color: Option<HexColor>,
    pub secondary_color: Option<HexColor>,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub members: Vec<MemberView>,
}

impl TeamView {
    pub fn palette(&self) -> store::Palette {
        store::Palette::from_parts(self.primary_color.clone(), self.secondary_color.clone())
    }
}

/// Row of the "my teams" list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamSummary {
    pub id: i64,
    pub company_name: String,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Public page of one member, carrying the team's branding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberCardView {
    pub member: MemberView,
    pub company_name: String,
    pub template_id: Option<i32>,
    pub primary_color: Option<HexColor>,
    pub secondary_color: Option<HexColor>,
    pub logo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_lines() {
        let text = "name,email,phone,title\n\
                    Ada Lovelace, ada@example.com, +44 1, Analyst\n\
                    \n\
                    Charles Babbage,,,\n";
        let upload = MembersUpload::from_lines(text);
        assert_eq!(upload.members.len(), 2);
        assert_eq!(upload.members[0].full_name, "Ada Lovelace");
        assert_eq!(upload.members[0].email.as_deref(), Some("ada@example.com"));
        assert_eq!(upload.members[0].job_title.as_deref(), Some("Analyst"));
        assert_eq!(upload.members[1].full_name, "Charles Babbage");
        assert_eq!(upload.members[1].email, None);
    }

    #[test]
    fn test_from_lines_without_header() {
        let upload = MembersUpload::from_lines("Ada,ada@example.com");
        assert_eq!(upload.members.len(), 1);
        assert_eq!(upload.members[0].phone, None);
    }

    #[test]
    fn test_normalize_reports_row() {
        let upload = MembersUpload {
            members: vec![
                MemberInput {
                    full_name: "Ada".to_string(),
                    ..Default::default()
                },
                MemberInput {
                    full_name: " ".to_string(),
                    ..Default::default()
                },
            ],
        };
        assert_eq!(
            upload.normalize(),
            Err(ValidationError::Row(
                2,
                Box::new(ValidationError::Required("full_name"))
            ))
        );
    }

    #[test]
    fn test_normalize_caps_member_count() {
        let upload = MembersUpload {
            members: vec![
                MemberInput {
                    full_name: "x".to_string(),
                    ..Default::default()
                };
                MembersUpload::MAX_MEMBERS + 1
            ],
        };
        assert!(matches!(
            upload.normalize(),
            Err(ValidationError::TooMany("members", _))
        ));
    }

    #[test]
    fn test_team_input_requires_company() {
        assert_eq!(
            TeamInput::default().normalize(),
            Err(ValidationError::Required("company_name"))
        );
        let ok = TeamInput {
            company_name: " Acme ".to_string(),
            ..Default::default()
        }
        .normalize()
        .unwrap();
        assert_eq!(ok.company_name, "Acme");
    }
}
