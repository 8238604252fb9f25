use api::{CardInput, MemberInput, StyleInput, TeamInput, TemplateInfo};
use sqlx::PgPool;

use super::{
    CardImage, CardRecord, ContactRecord, DbError, MemberRecord, NewUser, Repository, TeamCount,
    TeamRecord, UserRecord,
};
use crate::images::Image;
use crate::qr::{QrCode, QrFactory};

const USER_COLUMNS: &str =
    "id, name, email, password_hash, email_verified, verification_token, created_at";

const CARD_COLUMNS: &str = "id, user_id, full_name, email, phone, job_title, company_name, \
     company_website, address, bio, template_id, primary_color, secondary_color, logo, logo_mime, \
     profile_photo, profile_photo_mime, qr_url, qr_code, created_at, updated_at";

const TEAM_COLUMNS: &str = "id, user_id, company_name, template_id, primary_color, \
     secondary_color, logo, logo_mime, created_at, updated_at";

const MEMBER_COLUMNS: &str = "id, team_id, full_name, email, phone, job_title, qr_url, qr_code";

/// PostgreSQL-backed [`Repository`].
#[derive(Debug, Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn color(c: &Option<store::HexColor>) -> Option<&str> {
    c.as_ref().map(|c| c.as_str())
}

/// Unique violations become [`DbError::Conflict`].
fn conflict(err: sqlx::Error) -> DbError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => DbError::Conflict,
        _ => DbError::Sqlx(err),
    }
}

impl Repository for PgRepository {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, DbError> {
        sqlx::query_as(&format!(
            "INSERT INTO users (name, email, password_hash, verification_token)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.verification_token)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict)
    }

    async fn user_by_id(&self, id: i64) -> Result<Option<UserRecord>, DbError> {
        Ok(sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<UserRecord>, DbError> {
        Ok(sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn verify_email(&self, token: &str) -> Result<Option<UserRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "UPDATE users SET email_verified = TRUE, verification_token = NULL
             WHERE verification_token = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn templates(&self) -> Result<Vec<TemplateInfo>, DbError> {
        let rows: Vec<(i32, String, String, Option<String>)> = sqlx::query_as(
            "SELECT id, name, component_key, description FROM templates ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(template_info).collect())
    }

    async fn template(&self, id: i32) -> Result<Option<TemplateInfo>, DbError> {
        let row: Option<(i32, String, String, Option<String>)> = sqlx::query_as(
            "SELECT id, name, component_key, description FROM templates WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(template_info))
    }

    async fn create_card(&self, user_id: i64, input: &CardInput) -> Result<CardRecord, DbError> {
        Ok(sqlx::query_as(&format!(
            "INSERT INTO cards (user_id, full_name, email, phone, job_title, company_name,
                company_website, address, bio, template_id, primary_color, secondary_color)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.job_title)
        .bind(&input.company_name)
        .bind(&input.company_website)
        .bind(&input.address)
        .bind(&input.bio)
        .bind(input.template_id)
        .bind(color(&input.primary_color))
        .bind(color(&input.secondary_color))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn card(&self, id: i64) -> Result<Option<CardRecord>, DbError> {
        Ok(sqlx::query_as(&format!("SELECT {CARD_COLUMNS} FROM cards WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn cards_for_user(&self, user_id: i64) -> Result<Vec<CardRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_card(&self, id: i64, input: &CardInput) -> Result<Option<CardRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "UPDATE cards SET full_name = $2, email = $3, phone = $4, job_title = $5,
                company_name = $6, company_website = $7, address = $8, bio = $9,
                template_id = COALESCE($10, template_id),
                primary_color = COALESCE($11, primary_color),
                secondary_color = COALESCE($12, secondary_color),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.full_name)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.job_title)
        .bind(&input.company_name)
        .bind(&input.company_website)
        .bind(&input.address)
        .bind(&input.bio)
        .bind(input.template_id)
        .bind(color(&input.primary_color))
        .bind(color(&input.secondary_color))
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_card_style(&self, id: i64, style: &StyleInput) -> Result<Option<CardRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "UPDATE cards SET
                primary_color = COALESCE($2, primary_color),
                secondary_color = COALESCE($3, secondary_color),
                template_id = COALESCE($4, template_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(id)
        .bind(color(&style.primary_color))
        .bind(color(&style.secondary_color))
        .bind(style.template_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_card_image(&self, id: i64, slot: CardImage, image: Image) -> Result<Option<CardRecord>, DbError> {
        let (bytes_col, mime_col) = match slot {
            CardImage::Logo => ("logo", "logo_mime"),
            CardImage::ProfilePhoto => ("profile_photo", "profile_photo_mime"),
        };
        Ok(sqlx::query_as(&format!(
            "UPDATE cards SET {bytes_col} = $2, {mime_col} = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {CARD_COLUMNS}"
        ))
        .bind(id)
        .bind(&image.bytes)
        .bind(&image.mime)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_card_qr(&self, id: i64, qr: QrCode) -> Result<Option<CardRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "UPDATE cards SET qr_url = $2, qr_code = $3 WHERE id = $1 RETURNING {CARD_COLUMNS}"
        ))
        .bind(id)
        .bind(&qr.url)
        .bind(&qr.data_uri)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_card(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_team(&self, user_id: i64, input: &TeamInput) -> Result<TeamRecord, DbError> {
        Ok(sqlx::query_as(&format!(
            "INSERT INTO teams (user_id, company_name, template_id, primary_color, secondary_color)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(user_id)
        .bind(&input.company_name)
        .bind(input.template_id)
        .bind(color(&input.primary_color))
        .bind(color(&input.secondary_color))
        .fetch_one(&self.pool)
        .await?)
    }

    async fn team(&self, id: i64) -> Result<Option<TeamRecord>, DbError> {
        Ok(sqlx::query_as(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn teams_for_user(&self, user_id: i64) -> Result<Vec<TeamCount>, DbError> {
        Ok(sqlx::query_as(
            "SELECT t.id, t.company_name, COUNT(m.id) AS member_count, t.created_at
             FROM teams t
             LEFT JOIN team_members m ON m.team_id = t.id
             WHERE t.user_id = $1
             GROUP BY t.id
             ORDER BY t.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_team(&self, id: i64, input: &TeamInput) -> Result<Option<TeamRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "UPDATE teams SET company_name = $2,
                template_id = COALESCE($3, template_id),
                primary_color = COALESCE($4, primary_color),
                secondary_color = COALESCE($5, secondary_color),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.company_name)
        .bind(input.template_id)
        .bind(color(&input.primary_color))
        .bind(color(&input.secondary_color))
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn update_team_style(&self, id: i64, style: &StyleInput) -> Result<Option<TeamRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "UPDATE teams SET
                primary_color = COALESCE($2, primary_color),
                secondary_color = COALESCE($3, secondary_color),
                template_id = COALESCE($4, template_id),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id)
        .bind(color(&style.primary_color))
        .bind(color(&style.secondary_color))
        .bind(style.template_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn set_team_logo(&self, id: i64, image: Image) -> Result<Option<TeamRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "UPDATE teams SET logo = $2, logo_mime = $3, updated_at = NOW()
             WHERE id = $1
             RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id)
        .bind(&image.bytes)
        .bind(&image.mime)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_team(&self, id: i64) -> Result<bool, DbError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM team_members WHERE team_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn members(&self, team_id: i64) -> Result<Vec<MemberRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members WHERE team_id = $1 ORDER BY id"
        ))
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn member(&self, team_id: i64, member_id: i64) -> Result<Option<MemberRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members WHERE team_id = $1 AND id = $2"
        ))
        .bind(team_id)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn replace_members(
        &self,
        team_id: i64,
        members: Vec<MemberInput>,
        qr: &QrFactory,
    ) -> Result<Vec<MemberRecord>, DbError> {
        // Dropping `tx` on any early return rolls back.
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM team_members WHERE team_id = $1")
            .bind(team_id)
            .execute(&mut *tx)
            .await?;

        let mut created = Vec::with_capacity(members.len());
        for member in members {
            let (id,): (i64,) = sqlx::query_as(
                "INSERT INTO team_members (team_id, full_name, email, phone, job_title)
                 VALUES ($1, $2, $3, $4, $5)
                 RETURNING id",
            )
            .bind(team_id)
            .bind(&member.full_name)
            .bind(&member.email)
            .bind(&member.phone)
            .bind(&member.job_title)
            .fetch_one(&mut *tx)
            .await?;

            let code = qr.member(team_id, id)?;
            let record: MemberRecord = sqlx::query_as(&format!(
                "UPDATE team_members SET qr_url = $2, qr_code = $3 WHERE id = $1
                 RETURNING {MEMBER_COLUMNS}"
            ))
            .bind(id)
            .bind(&code.url)
            .bind(&code.data_uri)
            .fetch_one(&mut *tx)
            .await?;
            created.push(record);
        }

        tx.commit().await?;
        Ok(created)
    }

    async fn set_member_qr(&self, member_id: i64, qr: QrCode) -> Result<Option<MemberRecord>, DbError> {
        Ok(sqlx::query_as(&format!(
            "UPDATE team_members SET qr_url = $2, qr_code = $3 WHERE id = $1
             RETURNING {MEMBER_COLUMNS}"
        ))
        .bind(member_id)
        .bind(&qr.url)
        .bind(&qr.data_uri)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn contacts_for_user(&self, user_id: i64) -> Result<Vec<(ContactRecord, CardRecord)>, DbError> {
        let contacts: Vec<ContactRecord> = sqlx::query_as(
            "SELECT id, user_id, card_id, saved_at FROM contacts
             WHERE user_id = $1
             ORDER BY saved_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<i64> = contacts.iter().map(|c| c.card_id).collect();
        let cards: Vec<CardRecord> = sqlx::query_as(&format!(
            "SELECT {CARD_COLUMNS} FROM cards WHERE id = ANY($1)"
        ))
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(contacts
            .into_iter()
            .filter_map(|contact| {
                let card = cards.iter().find(|c| c.id == contact.card_id)?.clone();
                Some((contact, card))
            })
            .collect())
    }

    async fn save_contact(&self, user_id: i64, card_id: i64) -> Result<ContactRecord, DbError> {
        sqlx::query_as(
            "INSERT INTO contacts (user_id, card_id) VALUES ($1, $2)
             RETURNING id, user_id, card_id, saved_at",
        )
        .bind(user_id)
        .bind(card_id)
        .fetch_one(&self.pool)
        .await
        .map_err(conflict)
    }

    async fn delete_contact(&self, user_id: i64, card_id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM contacts WHERE user_id = $1 AND card_id = $2")
            .bind(user_id)
            .bind(card_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

fn template_info((id, name, component_key, description): (i32, String, String, Option<String>)) -> TemplateInfo {
    TemplateInfo {
        id,
        name,
        component_key,
        description,
    }
}
