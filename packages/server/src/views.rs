//! Record → API view conversions.

use api::{
    CardSummary, CardView, ContactView, MemberCardView, MemberView, TeamSummary, TeamView, UserInfo,
};
use store::HexColor;

use crate::db::{CardRecord, ContactRecord, MemberRecord, TeamCount, TeamRecord, UserRecord};
use crate::images::column_data_uri;

fn hex(value: &Option<String>) -> Option<HexColor> {
    value.as_deref().and_then(|v| HexColor::parse(v).ok())
}

pub fn user(record: &UserRecord) -> UserInfo {
    UserInfo {
        id: record.id,
        name: record.name.clone(),
        email: record.email.clone(),
        email_verified: record.email_verified,
    }
}

pub fn card(record: &CardRecord) -> CardView {
    CardView {
        id: record.id,
        user_id: record.user_id,
        full_name: record.full_name.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        job_title: record.job_title.clone(),
        company_name: record.company_name.clone(),
        company_website: record.company_website.clone(),
        address: record.address.clone(),
        bio: record.bio.clone(),
        template_id: record.template_id,
        primary_color: hex(&record.primary_color),
        secondary_color: hex(&record.secondary_color),
        logo: column_data_uri(&record.logo, &record.logo_mime),
        profile_photo: column_data_uri(&record.profile_photo, &record.profile_photo_mime),
        qr_url: record.qr_url.clone(),
        qr_code: record.qr_code.clone(),
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

pub fn card_summary(record: &CardRecord) -> CardSummary {
    CardSummary {
        id: record.id,
        full_name: record.full_name.clone(),
        job_title: record.job_title.clone(),
        company_name: record.company_name.clone(),
        template_id: record.template_id,
        created_at: record.created_at,
    }
}

pub fn member(record: &MemberRecord) -> MemberView {
    MemberView {
        id: record.id,
        team_id: record.team_id,
        full_name: record.full_name.clone(),
        email: record.email.clone(),
        phone: record.phone.clone(),
        job_title: record.job_title.clone(),
        qr_url: record.qr_url.clone(),
        qr_code: record.qr_code.clone(),
    }
}

pub fn team(record: &TeamRecord, members: &[MemberRecord]) -> TeamView {
    TeamView {
        id: record.id,
        user_id: record.user_id,
        company_name: record.company_name.clone(),
        template_id: record.template_id,
        primary_color: hex(&record.primary_color),
        secondary_color: hex(&record.secondary_color),
        logo: column_data_uri(&record.logo, &record.logo_mime),
        created_at: record.created_at,
        updated_at: record.updated_at,
        members: members.iter().map(member).collect(),
    }
}

pub fn team_summary(count: &TeamCount) -> TeamSummary {
    TeamSummary {
        id: count.id,
        company_name: count.company_name.clone(),
        member_count: count.member_count,
        created_at: count.created_at,
    }
}

pub fn member_card(team: &TeamRecord, record: &MemberRecord) -> MemberCardView {
    MemberCardView {
        member: member(record),
        company_name: team.company_name.clone(),
        template_id: team.template_id,
        primary_color: hex(&team.primary_color),
        secondary_color: hex(&team.secondary_color),
        logo: column_data_uri(&team.logo, &team.logo_mime),
    }
}

pub fn contact(record: &ContactRecord, saved: &CardRecord) -> ContactView {
    ContactView {
        id: record.id,
        saved_at: record.saved_at,
        card: card(saved),
    }
}
