//! QR payloads for cards and team members.
//!
//! The encoded URL always contains the row's own id, so a payload is
//! generated after the row exists and again whenever rows are recreated.

use base64::Engine as _;
use qrcodegen::QrCodeEcc;

const QUIET_ZONE: i32 = 4;

#[derive(Debug, thiserror::Error)]
#[error("qr encoding failed: {0}")]
pub struct QrError(String);

/// Stored payload: the URL and its rendering as a `data:image/svg+xml` URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrCode {
    pub url: String,
    pub data_uri: String,
}

/// Builds public URLs and their QR images from the configured base URL.
#[derive(Debug, Clone)]
pub struct QrFactory {
    base_url: String,
}

impl QrFactory {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn card_url(&self, card_id: i64) -> String {
        format!("{}/c/{card_id}", self.base_url)
    }

    pub fn member_url(&self, team_id: i64, member_id: i64) -> String {
        format!("{}/t/{team_id}/m/{member_id}", self.base_url)
    }

    pub fn card(&self, card_id: i64) -> Result<QrCode, QrError> {
        encode(self.card_url(card_id))
    }

    pub fn member(&self, team_id: i64, member_id: i64) -> Result<QrCode, QrError> {
        encode(self.member_url(team_id, member_id))
    }
}

pub fn encode(url: String) -> Result<QrCode, QrError> {
    let svg = to_svg(&url)?;
    let data_uri = format!(
        "data:image/svg+xml;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(svg)
    );
    Ok(QrCode { url, data_uri })
}

/// Render `text` as a standalone SVG document, one unit per module.
pub fn to_svg(text: &str) -> Result<String, QrError> {
    let qr = qrcodegen::QrCode::encode_text(text, QrCodeEcc::Medium)
        .map_err(|e| QrError(e.to_string()))?;
    Ok(svg_document(&qr))
}

/// Path data for the dark modules, offset by the quiet zone.
pub(crate) fn svg_path(qr: &qrcodegen::QrCode) -> String {
    let mut path = String::new();
    for y in 0..qr.size() {
        for x in 0..qr.size() {
            if qr.get_module(x, y) {
                if !path.is_empty() {
                    path.push(' ');
                }
                path.push_str(&format!("M{},{}h1v1h-1z", x + QUIET_ZONE, y + QUIET_ZONE));
            }
        }
    }
    path
}

/// Number of units per side, including the quiet zone.
pub(crate) fn svg_extent(qr: &qrcodegen::QrCode) -> i32 {
    qr.size() + QUIET_ZONE * 2
}

fn svg_document(qr: &qrcodegen::QrCode) -> String {
    let extent = svg_extent(qr);
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" viewBox="0 0 {0} {0}" stroke="none">"#,
            r##"<rect width="100%" height="100%" fill="#ffffff"/>"##,
            r##"<path d="{1}" fill="#000000"/>"##,
            "</svg>"
        ),
        extent,
        svg_path(qr)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_contain_ids() {
        let qr = QrFactory::new("https://cards.example.com/");
        assert_eq!(qr.card_url(42), "https://cards.example.com/c/42");
        assert_eq!(qr.member_url(3, 9), "https://cards.example.com/t/3/m/9");
    }

    #[test]
    fn test_encode_data_uri() {
        let code = QrFactory::new("http://localhost:8080").card(7).unwrap();
        assert_eq!(code.url, "http://localhost:8080/c/7");
        let payload = code
            .data_uri
            .strip_prefix("data:image/svg+xml;base64,")
            .unwrap();
        let svg = base64::engine::general_purpose::STANDARD
            .decode(payload)
            .unwrap();
        let svg = String::from_utf8(svg).unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("<path d=\"M"));
    }

    #[test]
    fn test_different_ids_differ() {
        let qr = QrFactory::new("http://localhost:8080");
        assert_ne!(qr.card(1).unwrap().data_uri, qr.card(2).unwrap().data_uri);
    }
}
