//! Server-side card face export as a single SVG document.
//!
//! Logo and QR code are embedded as `data:` images, so the file is
//! self-contained and can be downloaded or printed as is.

use api::{CardView, TemplateKind};

const WIDTH: u32 = 1050;
const HEIGHT: u32 = 600;
const QR_SIZE: u32 = 180;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn text(x: u32, y: u32, size: u32, weight: &str, fill: &str, anchor: &str, value: &str) -> String {
    format!(
        r#"<text x="{x}" y="{y}" font-family="Helvetica, Arial, sans-serif" font-size="{size}" font-weight="{weight}" fill="{fill}" text-anchor="{anchor}">{}</text>"#,
        escape(value)
    )
}

fn image(x: u32, y: u32, w: u32, h: u32, href: &str) -> String {
    format!(
        r#"<image x="{x}" y="{y}" width="{w}" height="{h}" preserveAspectRatio="xMidYMid meet" href="{}"/>"#,
        escape(href)
    )
}

/// Render `card` with the layout of `kind`.
pub fn card_svg(card: &CardView, kind: TemplateKind) -> String {
    let palette = card.palette();
    let primary = palette.primary.as_str();
    let secondary = palette.secondary.as_str();
    let on_primary = palette.primary.contrasting_text();

    let mut body = Vec::new();
    let (background, ink, text_x, anchor) = match kind {
        TemplateKind::Classic => {
            body.push(format!(
                r#"<rect x="0" y="0" width="{WIDTH}" height="180" fill="{primary}"/>"#
            ));
            body.push(format!(
                r#"<rect x="0" y="180" width="{WIDTH}" height="8" fill="{secondary}"/>"#
            ));
            ("#ffffff", "#111111", WIDTH / 2, "middle")
        }
        TemplateKind::Modern => {
            body.push(format!(
                r#"<rect x="0" y="0" width="40" height="{HEIGHT}" fill="{secondary}"/>"#
            ));
            ("#ffffff", "#111111", 90, "start")
        }
        TemplateKind::Minimal => {
            body.push(format!(
                r#"<rect x="60" y="250" width="300" height="3" fill="{primary}"/>"#
            ));
            ("#ffffff", "#111111", 60, "start")
        }
        TemplateKind::Bold => {
            body.push(format!(
                r#"<rect x="0" y="{}" width="{WIDTH}" height="12" fill="{secondary}"/>"#,
                HEIGHT - 12
            ));
            (primary, on_primary.as_str(), 60, "start")
        }
    };

    if let Some(logo) = &card.logo {
        let x = if anchor == "middle" { WIDTH / 2 - 70 } else { WIDTH - 200 };
        body.push(image(x, 20, 140, 140, logo));
    }

    let name_size = if kind == TemplateKind::Bold { 64 } else { 52 };
    let mut y = 260;
    body.push(text(text_x, y, name_size, "700", ink, anchor, &card.full_name));
    y += 50;
    if let Some(title) = &card.job_title {
        body.push(text(text_x, y, 30, "400", ink, anchor, title));
        y += 40;
    }
    if let Some(company) = &card.company_name {
        let company_fill = if kind == TemplateKind::Bold { ink } else { primary };
        body.push(text(text_x, y, 30, "600", company_fill, anchor, company));
        y += 50;
    }
    for line in [&card.email, &card.phone, &card.company_website, &card.address]
        .into_iter()
        .flatten()
    {
        body.push(text(text_x, y, 24, "400", ink, anchor, line));
        y += 34;
    }

    if let Some(qr) = &card.qr_code {
        body.push(format!(
            r##"<rect x="{}" y="{}" width="{s}" height="{s}" fill="#ffffff"/>"##,
            WIDTH - QR_SIZE - 30,
            HEIGHT - QR_SIZE - 30,
            s = QR_SIZE
        ));
        body.push(image(
            WIDTH - QR_SIZE - 30,
            HEIGHT - QR_SIZE - 30,
            QR_SIZE,
            QR_SIZE,
            qr,
        ));
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}"><rect width="100%" height="100%" fill="{background}"/>{}</svg>"#,
        body.join("")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use store::HexColor;

    fn card() -> CardView {
        CardView {
            id: 1,
            user_id: 1,
            full_name: "Ada <Lovelace>".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: None,
            job_title: Some("Analyst".to_string()),
            company_name: Some("Engines & Co".to_string()),
            company_website: None,
            address: None,
            bio: None,
            template_id: Some(4),
            primary_color: Some(HexColor::parse("#000000").unwrap()),
            secondary_color: None,
            logo: None,
            profile_photo: None,
            qr_url: None,
            qr_code: Some("data:image/svg+xml;base64,AAAA".to_string()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_escapes_text() {
        let svg = card_svg(&card(), TemplateKind::Classic);
        assert!(svg.contains("Ada &lt;Lovelace&gt;"));
        assert!(svg.contains("Engines &amp; Co"));
        assert!(!svg.contains("<Lovelace>"));
    }

    #[test]
    fn test_bold_uses_primary_background() {
        let svg = card_svg(&card(), TemplateKind::Bold);
        assert!(svg.contains(r##"<rect width="100%" height="100%" fill="#000000"/>"##));
        // white text on black
        assert!(svg.contains(r##"fill="#ffffff" text-anchor="start">Ada"##));
        assert!(svg.contains("data:image/svg+xml;base64,AAAA"));
    }

    #[test]
    fn test_default_secondary() {
        let svg = card_svg(&card(), TemplateKind::Modern);
        assert!(svg.contains(&format!("fill=\"{}\"", store::Palette::default().secondary.as_str())));
    }
}
