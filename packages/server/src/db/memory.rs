use std::sync::{Arc, Mutex, MutexGuard};

use api::{CardInput, MemberInput, StyleInput, TeamInput, TemplateInfo};
use chrono::Utc;

use super::{
    CardImage, CardRecord, ContactRecord, DbError, MemberRecord, NewUser, Repository, TeamCount,
    TeamRecord, UserRecord,
};
use crate::images::Image;
use crate::qr::{QrCode, QrFactory};

#[derive(Debug, Default)]
struct Tables {
    next_id: i64,
    users: Vec<UserRecord>,
    cards: Vec<CardRecord>,
    teams: Vec<TeamRecord>,
    members: Vec<MemberRecord>,
    contacts: Vec<ContactRecord>,
}

impl Tables {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-process [`Repository`] with the same semantics as the Postgres one,
/// including the seeded template catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every stored member row, across teams.
    pub fn member_count(&self) -> usize {
        self.lock().members.len()
    }

    pub fn contact_count(&self) -> usize {
        self.lock().contacts.len()
    }
}

fn seeded_templates() -> Vec<TemplateInfo> {
    [
        (1, "Classic", "classic", "Centered name over a solid primary band"),
        (2, "Modern", "modern", "Split layout with a secondary accent column"),
        (3, "Minimal", "minimal", "White card with a thin primary rule"),
        (4, "Bold", "bold", "Full-bleed primary background with large type"),
    ]
    .into_iter()
    .map(|(id, name, key, description)| TemplateInfo {
        id,
        name: name.to_string(),
        component_key: key.to_string(),
        description: Some(description.to_string()),
    })
    .collect()
}

fn color(c: &Option<store::HexColor>) -> Option<String> {
    c.as_ref().map(|c| c.as_str().to_string())
}

fn apply_style(
    style: &StyleInput,
    primary: &mut Option<String>,
    secondary: &mut Option<String>,
    template: &mut Option<i32>,
) {
    if let Some(c) = color(&style.primary_color) {
        *primary = Some(c);
    }
    if let Some(c) = color(&style.secondary_color) {
        *secondary = Some(c);
    }
    if style.template_id.is_some() {
        *template = style.template_id;
    }
}

impl Repository for MemoryRepository {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, DbError> {
        let mut t = self.lock();
        if t.users.iter().any(|u| u.email == user.email) {
            return Err(DbError::Conflict);
        }
        let record = UserRecord {
            id: t.id(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            email_verified: false,
            verification_token: Some(user.verification_token),
            created_at: Utc::now(),
        };
        t.users.push(record.clone());
        Ok(record)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<UserRecord>, DbError> {
        Ok(self.lock().users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DbError> {
        Ok(self.lock().users.iter().find(|u| u.email == email).cloned())
    }

    async fn verify_email(&self, token: &str) -> Result<Option<UserRecord>, DbError> {
        let mut t = self.lock();
        let user = t
            .users
            .iter_mut()
            .find(|u| u.verification_token.as_deref() == Some(token));
        Ok(user.map(|u| {
            u.email_verified = true;
            u.verification_token = None;
            u.clone()
        }))
    }

    async fn templates(&self) -> Result<Vec<TemplateInfo>, DbError> {
        Ok(seeded_templates())
    }

    async fn template(&self, id: i32) -> Result<Option<TemplateInfo>, DbError> {
        Ok(seeded_templates().into_iter().find(|t| t.id == id))
    }

    async fn create_card(&self, user_id: i64, input: &CardInput) -> Result<CardRecord, DbError> {
        let mut t = self.lock();
        let now = Utc::now();
        let record = CardRecord {
            id: t.id(),
            user_id,
            full_name: input.full_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            job_title: input.job_title.clone(),
            company_name: input.company_name.clone(),
            company_website: input.company_website.clone(),
            address: input.address.clone(),
            bio: input.bio.clone(),
            template_id: input.template_id,
            primary_color: color(&input.primary_color),
            secondary_color: color(&input.secondary_color),
            logo: None,
            logo_mime: None,
            profile_photo: None,
            profile_photo_mime: None,
            qr_url: None,
            qr_code: None,
            created_at: now,
            updated_at: now,
        };
        t.cards.push(record.clone());
        Ok(record)
    }

    async fn card(&self, id: i64) -> Result<Option<CardRecord>, DbError> {
        Ok(self.lock().cards.iter().find(|c| c.id == id).cloned())
    }

    async fn cards_for_user(&self, user_id: i64) -> Result<Vec<CardRecord>, DbError> {
        Ok(self
            .lock()
            .cards
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_card(&self, id: i64, input: &CardInput) -> Result<Option<CardRecord>, DbError> {
        let mut t = self.lock();
        Ok(t.cards.iter_mut().find(|c| c.id == id).map(|card| {
            card.full_name = input.full_name.clone();
            card.email = input.email.clone();
            card.phone = input.phone.clone();
            card.job_title = input.job_title.clone();
            card.company_name = input.company_name.clone();
            card.company_website = input.company_website.clone();
            card.address = input.address.clone();
            card.bio = input.bio.clone();
            let style = StyleInput {
                primary_color: input.primary_color.clone(),
                secondary_color: input.secondary_color.clone(),
                template_id: input.template_id,
            };
            apply_style(
                &style,
                &mut card.primary_color,
                &mut card.secondary_color,
                &mut card.template_id,
            );
            card.updated_at = Utc::now();
            card.clone()
        }))
    }

    async fn update_card_style(&self, id: i64, style: &StyleInput) -> Result<Option<CardRecord>, DbError> {
        let mut t = self.lock();
        Ok(t.cards.iter_mut().find(|c| c.id == id).map(|card| {
            apply_style(
                style,
                &mut card.primary_color,
                &mut card.secondary_color,
                &mut card.template_id,
            );
            card.updated_at = Utc::now();
            card.clone()
        }))
    }

    async fn set_card_image(&self, id: i64, slot: CardImage, image: Image) -> Result<Option<CardRecord>, DbError> {
        let mut t = self.lock();
        Ok(t.cards.iter_mut().find(|c| c.id == id).map(|card| {
            match slot {
                CardImage::Logo => {
                    card.logo = Some(image.bytes);
                    card.logo_mime = Some(image.mime);
                }
                CardImage::ProfilePhoto => {
                    card.profile_photo = Some(image.bytes);
                    card.profile_photo_mime = Some(image.mime);
                }
            }
            card.updated_at = Utc::now();
            card.clone()
        }))
    }

    async fn set_card_qr(&self, id: i64, qr: QrCode) -> Result<Option<CardRecord>, DbError> {
        let mut t = self.lock();
        Ok(t.cards.iter_mut().find(|c| c.id == id).map(|card| {
            card.qr_url = Some(qr.url);
            card.qr_code = Some(qr.data_uri);
            card.clone()
        }))
    }

    async fn delete_card(&self, id: i64) -> Result<bool, DbError> {
        let mut t = self.lock();
        let before = t.cards.len();
        t.cards.retain(|c| c.id != id);
        t.contacts.retain(|c| c.card_id != id);
        Ok(t.cards.len() < before)
    }

    async fn create_team(&self, user_id: i64, input: &TeamInput) -> Result<TeamRecord, DbError> {
        let mut t = self.lock();
        let now = Utc::now();
        let record = TeamRecord {
            id: t.id(),
            user_id,
            company_name: input.company_name.clone(),
            template_id: input.template_id,
            primary_color: color(&input.primary_color),
            secondary_color: color(&input.secondary_color),
            logo: None,
            logo_mime: None,
            created_at: now,
            updated_at: now,
        };
        t.teams.push(record.clone());
        Ok(record)
    }

    async fn team(&self, id: i64) -> Result<Option<TeamRecord>, DbError> {
        Ok(self.lock().teams.iter().find(|t| t.id == id).cloned())
    }

    async fn teams_for_user(&self, user_id: i64) -> Result<Vec<TeamCount>, DbError> {
        let t = self.lock();
        Ok(t.teams
            .iter()
            .filter(|team| team.user_id == user_id)
            .map(|team| TeamCount {
                id: team.id,
                company_name: team.company_name.clone(),
                member_count: t.members.iter().filter(|m| m.team_id == team.id).count() as i64,
                created_at: team.created_at,
            })
            .collect())
    }

    async fn update_team(&self, id: i64, input: &TeamInput) -> Result<Option<TeamRecord>, DbError> {
        let mut t = self.lock();
        Ok(t.teams.iter_mut().find(|team| team.id == id).map(|team| {
            team.company_name = input.company_name.clone();
            let style = StyleInput {
                primary_color: input.primary_color.clone(),
                secondary_color: input.secondary_color.clone(),
                template_id: input.template_id,
            };
            apply_style(
                &style,
                &mut team.primary_color,
                &mut team.secondary_color,
                &mut team.template_id,
            );
            team.updated_at = Utc::now();
            team.clone()
        }))
    }

    async fn update_team_style(&self, id: i64, style: &StyleInput) -> Result<Option<TeamRecord>, DbError> {
        let mut t = self.lock();
        Ok(t.teams.iter_mut().find(|team| team.id == id).map(|team| {
            apply_style(
                style,
                &mut team.primary_color,
                &mut team.secondary_color,
                &mut team.template_id,
            );
            team.updated_at = Utc::now();
            team.clone()
        }))
    }

    async fn set_team_logo(&self, id: i64, image: Image) -> Result<Option<TeamRecord>, DbError> {
        let mut t = self.lock();
        Ok(t.teams.iter_mut().find(|team| team.id == id).map(|team| {
            team.logo = Some(image.bytes);
            team.logo_mime = Some(image.mime);
            team.updated_at = Utc::now();
            team.clone()
        }))
    }

    async fn delete_team(&self, id: i64) -> Result<bool, DbError> {
        let mut t = self.lock();
        if !t.teams.iter().any(|team| team.id == id) {
            return Ok(false);
        }
        t.members.retain(|m| m.team_id != id);
        t.teams.retain(|team| team.id != id);
        Ok(true)
    }

    async fn members(&self, team_id: i64) -> Result<Vec<MemberRecord>, DbError> {
        Ok(self
            .lock()
            .members
            .iter()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect())
    }

    async fn member(&self, team_id: i64, member_id: i64) -> Result<Option<MemberRecord>, DbError> {
        Ok(self
            .lock()
            .members
            .iter()
            .find(|m| m.team_id == team_id && m.id == member_id)
            .cloned())
    }

    async fn replace_members(
        &self,
        team_id: i64,
        members: Vec<MemberInput>,
        qr: &QrFactory,
    ) -> Result<Vec<MemberRecord>, DbError> {
        let mut t = self.lock();

        // Build the new rows first so a failure leaves the old list intact.
        let mut next_id = t.next_id;
        let mut created = Vec::with_capacity(members.len());
        for member in members {
            next_id += 1;
            let code = qr.member(team_id, next_id)?;
            created.push(MemberRecord {
                id: next_id,
                team_id,
                full_name: member.full_name,
                email: member.email,
                phone: member.phone,
                job_title: member.job_title,
                qr_url: Some(code.url),
                qr_code: Some(code.data_uri),
            });
        }

        t.next_id = next_id;
        t.members.retain(|m| m.team_id != team_id);
        t.members.extend(created.iter().cloned());
        Ok(created)
    }

    async fn set_member_qr(&self, member_id: i64, qr: QrCode) -> Result<Option<MemberRecord>, DbError> {
        let mut t = self.lock();
        Ok(t.members.iter_mut().find(|m| m.id == member_id).map(|m| {
            m.qr_url = Some(qr.url);
            m.qr_code = Some(qr.data_uri);
            m.clone()
        }))
    }

    async fn contacts_for_user(&self, user_id: i64) -> Result<Vec<(ContactRecord, CardRecord)>, DbError> {
        let t = self.lock();
        let mut saved: Vec<(ContactRecord, CardRecord)> = t
            .contacts
            .iter()
            .filter(|c| c.user_id == user_id)
            .filter_map(|c| {
                let card = t.cards.iter().find(|card| card.id == c.card_id)?;
                Some((c.clone(), card.clone()))
            })
            .collect();
        saved.sort_by(|(a, _), (b, _)| b.saved_at.cmp(&a.saved_at).then(b.id.cmp(&a.id)));
        Ok(saved)
    }

    async fn save_contact(&self, user_id: i64, card_id: i64) -> Result<ContactRecord, DbError> {
        let mut t = self.lock();
        if t.contacts
            .iter()
            .any(|c| c.user_id == user_id && c.card_id == card_id)
        {
            return Err(DbError::Conflict);
        }
        let record = ContactRecord {
            id: t.id(),
            user_id,
            card_id,
            saved_at: Utc::now(),
        };
        t.contacts.push(record.clone());
        Ok(record)
    }

    async fn delete_contact(&self, user_id: i64, card_id: i64) -> Result<bool, DbError> {
        let mut t = self.lock();
        let before = t.contacts.len();
        t.contacts
            .retain(|c| !(c.user_id == user_id && c.card_id == card_id));
        Ok(t.contacts.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(name: &str) -> MemberInput {
        MemberInput {
            full_name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_replace_members_swaps_list() {
        let repo = MemoryRepository::new();
        let qr = QrFactory::new("http://localhost");
        let team = repo
            .create_team(1, &TeamInput { company_name: "Acme".into(), ..Default::default() })
            .await
            .unwrap();

        repo.replace_members(team.id, vec![member("a"), member("b")], &qr)
            .await
            .unwrap();
        let second = repo
            .replace_members(team.id, vec![member("c")], &qr)
            .await
            .unwrap();

        let stored = repo.members(team.id).await.unwrap();
        assert_eq!(stored, second);
        assert_eq!(stored.len(), 1);
        assert_eq!(
            stored[0].qr_url.as_deref(),
            Some(format!("http://localhost/t/{}/m/{}", team.id, stored[0].id).as_str())
        );
    }

    #[tokio::test]
    async fn test_delete_team_removes_members() {
        let repo = MemoryRepository::new();
        let qr = QrFactory::new("http://localhost");
        let keep = repo
            .create_team(1, &TeamInput { company_name: "Keep".into(), ..Default::default() })
            .await
            .unwrap();
        let gone = repo
            .create_team(1, &TeamInput { company_name: "Gone".into(), ..Default::default() })
            .await
            .unwrap();
        repo.replace_members(keep.id, vec![member("k")], &qr).await.unwrap();
        repo.replace_members(gone.id, vec![member("x"), member("y")], &qr)
            .await
            .unwrap();

        assert!(repo.delete_team(gone.id).await.unwrap());
        assert!(!repo.delete_team(gone.id).await.unwrap());
        assert_eq!(repo.member_count(), 1);
        assert!(repo.team(gone.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_contact_pair_is_unique() {
        let repo = MemoryRepository::new();
        repo.save_contact(1, 5).await.unwrap();
        assert!(matches!(repo.save_contact(1, 5).await, Err(DbError::Conflict)));
        repo.save_contact(2, 5).await.unwrap();
        assert_eq!(repo.contact_count(), 2);
    }

    #[tokio::test]
    async fn test_verify_email_consumes_token() {
        let repo = MemoryRepository::new();
        repo.create_user(NewUser {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "x".into(),
            verification_token: "tok".into(),
        })
        .await
        .unwrap();

        let user = repo.verify_email("tok").await.unwrap().unwrap();
        assert!(user.email_verified);
        assert!(repo.verify_email("tok").await.unwrap().is_none());
    }
}
