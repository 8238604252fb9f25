//! Uploaded logos and profile photos.

use base64::Engine as _;
use file_format::FileFormat;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ImageError {
    #[error("unsupported image format")]
    Unsupported,
    #[error("image is larger than {0} bytes")]
    TooLarge(usize),
    #[error("image is empty")]
    Empty,
}

/// Validated image bytes with the media type detected from their content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Image {
    /// Sniff the format from the bytes; the client's declared type is ignored.
    pub fn detect(bytes: Vec<u8>, max_bytes: usize) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if bytes.len() > max_bytes {
            return Err(ImageError::TooLarge(max_bytes));
        }

        let mime = match FileFormat::from_bytes(&bytes) {
            FileFormat::PortableNetworkGraphics => "image/png",
            FileFormat::JointPhotographicExpertsGroup => "image/jpeg",
            FileFormat::GraphicsInterchangeFormat => "image/gif",
            FileFormat::Webp => "image/webp",
            FileFormat::ScalableVectorGraphics => "image/svg+xml",
            _ if looks_like_svg(&bytes) => "image/svg+xml",
            _ => return Err(ImageError::Unsupported),
        };

        Ok(Self {
            mime: mime.to_string(),
            bytes,
        })
    }
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Data URI for an optional image column pair.
pub fn column_data_uri(bytes: &Option<Vec<u8>>, mime: &Option<String>) -> Option<String> {
    match (bytes, mime) {
        (Some(bytes), Some(mime)) => Some(data_uri(mime, bytes)),
        _ => None,
    }
}

// SVG is text; the byte sniffer only recognizes it with an XML prolog.
fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    std::str::from_utf8(head)
        .map(|s| s.trim_start().starts_with("<svg"))
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const PNG: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89,
    ];

    #[test]
    fn test_detect_png() {
        let image = Image::detect(PNG.to_vec(), 1024).unwrap();
        assert_eq!(image.mime, "image/png");
        assert!(data_uri(&image.mime, &image.bytes).starts_with("data:image/png;base64,iVBORw0KGgo"));
    }

    #[test]
    fn test_detect_bare_svg() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg"></svg>"#;
        assert_eq!(Image::detect(svg.to_vec(), 1024).unwrap().mime, "image/svg+xml");
    }

    #[test]
    fn test_rejects() {
        assert_eq!(Image::detect(Vec::new(), 10), Err(ImageError::Empty));
        assert_eq!(
            Image::detect(b"just some text".to_vec(), 1024),
            Err(ImageError::Unsupported)
        );
        assert_eq!(Image::detect(PNG.to_vec(), 8), Err(ImageError::TooLarge(8)));
    }
}
