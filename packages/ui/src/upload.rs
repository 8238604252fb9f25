//! Reading picked files into uploads and `data:` previews.

use api::Upload;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use dioxus::prelude::*;

/// Media type guessed from the file extension; the server sniffs the bytes
/// again before storing anything.
pub fn image_mime(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

pub fn data_url(upload: &Upload) -> String {
    format!(
        "data:{};base64,{}",
        image_mime(&upload.file_name),
        STANDARD.encode(&upload.bytes)
    )
}

/// First file of a file-input change event.
pub async fn first_file(evt: &FormEvent) -> Option<Upload> {
    let file = evt.files().into_iter().next()?;
    let file_name = file.name();
    match file.read_bytes().await {
        Ok(bytes) => Some(Upload {
            file_name,
            bytes: bytes.to_vec(),
        }),
        Err(e) => {
            tracing::warn!("Failed to read {}: {}", file_name, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime() {
        assert_eq!(image_mime("logo.PNG"), "image/png");
        assert_eq!(image_mime("photo.jpeg"), "image/jpeg");
        assert_eq!(image_mime("mark.svg"), "image/svg+xml");
        assert_eq!(image_mime("README"), "application/octet-stream");
    }

    #[test]
    fn test_data_url() {
        let upload = Upload {
            file_name: "a.gif".to_string(),
            bytes: b"GIF89a".to_vec(),
        };
        assert_eq!(data_url(&upload), "data:image/gif;base64,R0lGODlh");
    }
}
