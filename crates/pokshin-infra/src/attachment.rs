//! Image attachments, embedded in posts as `data:` URLs.

use base64::{Engine, prelude::BASE64_STANDARD};
use mime::Mime;

/// Default upper bound for an attached image.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("Attachment is empty")]
    Empty,

    #[error("Attachment is {size} bytes, the limit is {limit}")]
    TooLarge { size: usize, limit: usize },

    #[error("Not a supported image (declared {0})")]
    NotAnImage(String),
}

/// Detect the image type from its leading bytes.
pub fn sniff_image(bytes: &[u8]) -> Option<Mime> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some(mime::IMAGE_PNG)
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some(mime::IMAGE_JPEG)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some(mime::IMAGE_GIF)
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp".parse().ok()
    } else {
        None
    }
}

/// Encode an uploaded image as an inline data URL.
///
/// The content is sniffed; a declared type is only used to reject uploads that
/// claim not to be images at all.
pub fn to_data_url(
    bytes: &[u8],
    declared: Option<&Mime>,
    max_bytes: usize,
) -> Result<String, AttachmentError> {
    if bytes.is_empty() {
        return Err(AttachmentError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(AttachmentError::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }

    let declared_name = declared.map(|m| m.essence_str().to_string()).unwrap_or_default();
    if declared.is_some_and(|m| m.type_() != mime::IMAGE && *m != mime::APPLICATION_OCTET_STREAM) {
        return Err(AttachmentError::NotAnImage(declared_name));
    }

    let sniffed = sniff_image(bytes).ok_or(AttachmentError::NotAnImage(declared_name))?;
    Ok(format!(
        "data:{};base64,{}",
        sniffed.essence_str(),
        BASE64_STANDARD.encode(bytes)
    ))
}
