//! On-screen card rendering.
//!
//! [`CardFace`] draws one business card with the layout of a
//! [`TemplateKind`] and the colors of a [`Palette`]. Personal cards, teams
//! and public member pages all go through [`FaceData`], so every screen that
//! shows a card renders it the same way.

use api::{CardInput, CardView, MemberCardView, TeamView, TemplateInfo, TemplateKind};
use dioxus::prelude::*;
use store::Palette;

/// Everything a card face shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FaceData {
    pub name: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub address: Option<String>,
    pub logo: Option<String>,
    pub photo: Option<String>,
    pub qr_code: Option<String>,
    pub palette: Palette,
}

impl FaceData {
    pub fn from_card(card: &CardView) -> Self {
        Self {
            name: card.full_name.clone(),
            title: card.job_title.clone(),
            company: card.company_name.clone(),
            email: card.email.clone(),
            phone: card.phone.clone(),
            website: card.company_website.clone(),
            address: card.address.clone(),
            logo: card.logo.clone(),
            photo: card.profile_photo.clone(),
            qr_code: card.qr_code.clone(),
            palette: card.palette(),
        }
    }

    /// Unsaved form contents, used for the live preview.
    pub fn from_input(input: &CardInput) -> Self {
        Self {
            name: input.full_name.clone(),
            title: input.job_title.clone(),
            company: input.company_name.clone(),
            email: input.email.clone(),
            phone: input.phone.clone(),
            website: input.company_website.clone(),
            address: input.address.clone(),
            palette: Palette::from_parts(input.primary_color.clone(), input.secondary_color.clone()),
            ..Default::default()
        }
    }

    /// A team's branding with placeholder member details.
    pub fn from_team(team: &TeamView) -> Self {
        Self {
            name: "Team member".to_string(),
            title: Some("Job title".to_string()),
            company: Some(team.company_name.clone()),
            logo: team.logo.clone(),
            palette: team.palette(),
            ..Default::default()
        }
    }

    pub fn from_member(view: &MemberCardView) -> Self {
        Self {
            name: view.member.full_name.clone(),
            title: view.member.job_title.clone(),
            company: Some(view.company_name.clone()),
            email: view.member.email.clone(),
            phone: view.member.phone.clone(),
            logo: view.logo.clone(),
            qr_code: view.member.qr_code.clone(),
            palette: Palette::from_parts(view.primary_color.clone(), view.secondary_color.clone()),
            ..Default::default()
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_logo(mut self, logo: Option<String>) -> Self {
        if logo.is_some() {
            self.logo = logo;
        }
        self
    }
}

/// Layout for a stored template id; unknown ids render as classic.
pub fn kind_for(templates: &[TemplateInfo], template_id: Option<i32>) -> TemplateKind {
    template_id
        .and_then(|id| templates.iter().find(|t| t.id == id))
        .map(|t| t.kind())
        .unwrap_or_default()
}

#[component]
pub fn CardFace(
    face: FaceData,
    #[props(default)] kind: TemplateKind,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let primary = face.palette.primary.as_str().to_string();
    let secondary = face.palette.secondary.as_str().to_string();
    let on_primary = face.palette.primary.contrasting_text().as_str().to_string();

    let (card_style, header_style, name_color, accent) = match kind {
        TemplateKind::Classic => (
            "background: #ffffff; color: #111111; text-align: center;".to_string(),
            format!("background: {primary}; height: 30%; border-bottom: 4px solid {secondary};"),
            "#111111".to_string(),
            primary.clone(),
        ),
        TemplateKind::Modern => (
            format!("background: #ffffff; color: #111111; border-left: 14px solid {secondary};"),
            String::new(),
            primary.clone(),
            secondary.clone(),
        ),
        TemplateKind::Minimal => (
            "background: #ffffff; color: #111111;".to_string(),
            String::new(),
            "#111111".to_string(),
            primary.clone(),
        ),
        TemplateKind::Bold => (
            format!("background: {primary}; color: {on_primary}; border-bottom: 8px solid {secondary};"),
            String::new(),
            on_primary.clone(),
            on_primary.clone(),
        ),
    };

    let kind_key = kind.as_str();
    let name = if face.name.trim().is_empty() {
        "Your name".to_string()
    } else {
        face.name.clone()
    };
    let contact_lines: Vec<String> = [&face.email, &face.phone, &face.website, &face.address]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

    rsx! {
        div {
            class: "card-face card-face-{kind_key} {class}",
            style: "position: relative; aspect-ratio: 7 / 4; border-radius: 12px; overflow: hidden; box-shadow: 0 4px 16px rgba(0,0,0,0.12); font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif; {card_style}",

            if !header_style.is_empty() {
                div { style: "{header_style}" }
            }

            div {
                style: "padding: 1.25rem 1.5rem; display: flex; gap: 1rem; align-items: flex-start;",

                if let Some(photo) = face.photo.clone() {
                    img {
                        src: "{photo}",
                        alt: "Profile photo",
                        style: "width: 64px; height: 64px; border-radius: 50%; object-fit: cover;",
                    }
                }

                div {
                    style: "flex: 1; min-width: 0;",
                    h2 {
                        style: "margin: 0; font-size: 1.4rem; font-weight: 700; color: {name_color};",
                        "{name}"
                    }
                    if kind == TemplateKind::Minimal {
                        div { style: "width: 40%; height: 2px; margin: 0.4rem 0; background: {primary};" }
                    }
                    if let Some(title) = face.title.clone() {
                        p { style: "margin: 0.2rem 0 0; font-size: 0.95rem;", "{title}" }
                    }
                    if let Some(company) = face.company.clone() {
                        p { style: "margin: 0.2rem 0 0; font-weight: 600; color: {accent};", "{company}" }
                    }
                    div {
                        style: "margin-top: 0.6rem; font-size: 0.8rem; line-height: 1.4;",
                        for line in contact_lines {
                            div { "{line}" }
                        }
                    }
                }

                if let Some(logo) = face.logo.clone() {
                    img {
                        src: "{logo}",
                        alt: "Logo",
                        style: "max-width: 72px; max-height: 72px; object-fit: contain;",
                    }
                }
            }

            if let Some(qr) = face.qr_code.clone() {
                img {
                    src: "{qr}",
                    alt: "QR code",
                    style: "position: absolute; right: 12px; bottom: 12px; width: 22%; background: #ffffff; padding: 4px; border-radius: 4px;",
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::HexColor;

    fn template(id: i32, key: &str) -> TemplateInfo {
        TemplateInfo {
            id,
            name: key.to_string(),
            component_key: key.to_string(),
            description: None,
        }
    }

    #[test]
    fn test_kind_for_template_id() {
        let templates = vec![template(1, "classic"), template(4, "bold")];
        assert_eq!(kind_for(&templates, Some(4)), TemplateKind::Bold);
        assert_eq!(kind_for(&templates, Some(9)), TemplateKind::Classic);
        assert_eq!(kind_for(&templates, None), TemplateKind::Classic);
    }

    #[test]
    fn test_from_input_uses_default_palette() {
        let input = CardInput {
            full_name: "Ada".to_string(),
            secondary_color: Some(HexColor::parse("#fff").unwrap()),
            ..Default::default()
        };
        let face = FaceData::from_input(&input);
        assert_eq!(face.palette.primary.as_str(), HexColor::DEFAULT_PRIMARY);
        assert_eq!(face.palette.secondary.as_str(), "#ffffff");
    }

    #[test]
    fn test_with_logo_keeps_existing_when_none() {
        let face = FaceData {
            logo: Some("data:image/png;base64,AA".to_string()),
            ..Default::default()
        }
        .with_logo(None);
        assert!(face.logo.is_some());
    }
}
