//! vCard 3.0 export of a personal card.

use crate::models::CardView;

const MAX_LINE_OCTETS: usize = 75;

/// Render a card as a vCard. Lines end in CRLF and are folded at 75 octets.
pub fn render(card: &CardView) -> String {
    let mut out = String::new();
    push(&mut out, "BEGIN:VCARD");
    push(&mut out, "VERSION:3.0");

    let (given, family) = split_name(&card.full_name);
    push(&mut out, &format!("FN:{}", escape(&card.full_name)));
    push(&mut out, &format!("N:{};{};;;", escape(family), escape(given)));

    let optional = [
        ("ORG", &card.company_name),
        ("TITLE", &card.job_title),
        ("EMAIL;TYPE=INTERNET", &card.email),
        ("TEL;TYPE=CELL", &card.phone),
        ("URL", &card.company_website),
        ("NOTE", &card.bio),
    ];
    for (name, value) in optional {
        if let Some(v) = value {
            push(&mut out, &format!("{name}:{}", escape(v)));
        }
    }
    if let Some(address) = &card.address {
        // street;locality;region;code;country all collapse into the street slot
        push(&mut out, &format!("ADR;TYPE=WORK:;;{};;;;", escape(address)));
    }

    push(&mut out, "END:VCARD");
    out
}

/// Suggested download name, e.g. `grace-hopper.vcf`.
pub fn file_name(card: &CardView) -> String {
    let slug: String = card
        .full_name
        .split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        format!("card-{}.vcf", card.id)
    } else {
        format!("{slug}.vcf")
    }
}

fn split_name(full: &str) -> (&str, &str) {
    let full = full.trim();
    match full.rsplit_once(char::is_whitespace) {
        Some((given, family)) => (given.trim_end(), family),
        None => (full, ""),
    }
}

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

fn push(out: &mut String, line: &str) {
    let mut octets = 0;
    for c in line.chars() {
        if octets + c.len_utf8() > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            octets = 1;
        }
        out.push(c);
        octets += c.len_utf8();
    }
    out.push_str("\r\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn card() -> CardView {
        CardView {
            id: 7,
            user_id: 1,
            full_name: "Grace Brewster Hopper".to_string(),
            email: Some("grace@navy.mil".to_string()),
            phone: None,
            job_title: Some("Rear Admiral".to_string()),
            company_name: Some("US Navy; Reserve".to_string()),
            company_website: None,
            address: None,
            bio: Some("Line one\nLine two, with comma".to_string()),
            template_id: None,
            primary_color: None,
            secondary_color: None,
            logo: None,
            profile_photo: None,
            qr_url: None,
            qr_code: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render() {
        let text = render(&card());
        let lines: Vec<&str> = text.split("\r\n").collect();
        assert_eq!(lines[0], "BEGIN:VCARD");
        assert_eq!(lines[1], "VERSION:3.0");
        assert!(lines.contains(&"FN:Grace Brewster Hopper"));
        assert!(lines.contains(&"N:Hopper;Grace Brewster;;;"));
        assert!(lines.contains(&"ORG:US Navy\\; Reserve"));
        assert!(lines.contains(&"NOTE:Line one\\nLine two\\, with comma"));
        assert!(!text.contains("TEL"));
        assert!(text.ends_with("END:VCARD\r\n"));
    }

    #[test]
    fn test_long_lines_fold() {
        let mut c = card();
        c.bio = Some("x".repeat(200));
        let text = render(&c);
        for line in text.split("\r\n") {
            assert!(line.len() <= MAX_LINE_OCTETS, "{line:?}");
        }
        let unfolded = text.replace("\r\n ", "");
        assert!(unfolded.contains(&format!("NOTE:{}", "x".repeat(200))));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(&card()), "grace-brewster-hopper.vcf");
        let mut c = card();
        c.full_name = "李".to_string();
        assert_eq!(file_name(&c), "card-7.vcf");
    }
}
