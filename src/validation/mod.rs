//! Input validation module

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use thiserror::Error;

use crate::models::{AddFollowUp, AddPhoto, Attachment, CreateInspection};

/// Inline attachments cap. Everything travels base64-inline, so this also
/// bounds request bodies.
const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Field '{field}' is required")]
    Required { field: String },

    #[error("Field '{field}' is too long (max {max} characters)")]
    TooLong { field: String, max: usize },

    #[error("Invalid data URI (expected 'data:<mime>;base64,<payload>')")]
    InvalidDataUri,

    #[error("Invalid photo URL (expected http(s) or a data URI)")]
    InvalidPhotoUrl,

    #[error("Attachment too large (max {max_mb} MB)")]
    AttachmentTooLarge { max_mb: usize },

    #[error("Declared type '{declared}' does not match file contents ('{detected}')")]
    MimeMismatch { declared: String, detected: String },
}

/// Validate an intake request.
pub fn validate_create_inspection(input: &CreateInspection) -> Result<(), ValidationError> {
    if input.address.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "address".to_string(),
        });
    }
    if input.address.len() > 500 {
        return Err(ValidationError::TooLong {
            field: "address".to_string(),
            max: 500,
        });
    }

    if let Some(ref point) = input.reference_point {
        if point.len() > 500 {
            return Err(ValidationError::TooLong {
                field: "reference_point".to_string(),
                max: 500,
            });
        }
    }

    for attachment in &input.attachments {
        validate_attachment(attachment)?;
    }

    Ok(())
}

/// Validate an intake attachment: a named, decodable data URI whose magic
/// bytes agree with the declared MIME type (when the signature is one we
/// can detect — plain text has none).
pub fn validate_attachment(attachment: &Attachment) -> Result<(), ValidationError> {
    if attachment.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "attachment.name".to_string(),
        });
    }

    let (declared, bytes) = decode_data_uri(&attachment.data)?;

    if bytes.len() > MAX_ATTACHMENT_BYTES {
        return Err(ValidationError::AttachmentTooLarge {
            max_mb: MAX_ATTACHMENT_BYTES / (1024 * 1024),
        });
    }

    if let Some(detected) = infer::get(&bytes) {
        if detected.mime_type() != declared && detected.mime_type() != attachment.mime_type {
            return Err(ValidationError::MimeMismatch {
                declared: attachment.mime_type.clone(),
                detected: detected.mime_type().to_string(),
            });
        }
    }

    Ok(())
}

/// Photos arrive either as data URIs (camera/file capture) or as http(s)
/// URLs handed back by the external object storage.
pub fn validate_photo(photo: &AddPhoto) -> Result<(), ValidationError> {
    if photo.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }
    if photo.url.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "url".to_string(),
        });
    }

    if photo.url.starts_with("data:") {
        decode_data_uri(&photo.url)?;
        Ok(())
    } else if photo.url.starts_with("https://") || photo.url.starts_with("http://") {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhotoUrl)
    }
}

pub fn validate_follow_up(input: &AddFollowUp) -> Result<(), ValidationError> {
    if input.notes.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "notes".to_string(),
        });
    }
    Ok(())
}

/// Split a `data:<mime>;base64,<payload>` URI into its declared MIME type
/// and decoded payload.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), ValidationError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or(ValidationError::InvalidDataUri)?;
    let (mime, payload) = rest
        .split_once(";base64,")
        .ok_or(ValidationError::InvalidDataUri)?;
    if mime.is_empty() {
        return Err(ValidationError::InvalidDataUri);
    }
    let bytes = BASE64
        .decode(payload.trim())
        .map_err(|_| ValidationError::InvalidDataUri)?;
    Ok((mime.to_string(), bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Smallest valid JPEG header, enough for magic-byte detection.
    const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46];

    fn data_uri(mime: &str, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", mime, BASE64.encode(bytes))
    }

    fn create_input(address: &str) -> CreateInspection {
        CreateInspection {
            address: address.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_inspection_requires_address() {
        assert!(matches!(
            validate_create_inspection(&create_input("  ")),
            Err(ValidationError::Required { .. })
        ));
        assert!(validate_create_inspection(&create_input("Rua A, 1")).is_ok());
    }

    #[test]
    fn test_decode_data_uri() {
        let (mime, bytes) = decode_data_uri(&data_uri("image/jpeg", JPEG_MAGIC)).unwrap();
        assert_eq!(mime, "image/jpeg");
        assert_eq!(bytes, JPEG_MAGIC);
    }

    #[test]
    fn test_decode_data_uri_rejects_garbage() {
        assert!(decode_data_uri("not-a-uri").is_err());
        assert!(decode_data_uri("data:;base64,AAAA").is_err());
        assert!(decode_data_uri("data:text/plain;base64,@@@").is_err());
    }

    #[test]
    fn test_attachment_magic_bytes_must_match() {
        let attachment = Attachment {
            name: "alvara.pdf".to_string(),
            mime_type: "application/pdf".to_string(),
            data: data_uri("application/pdf", JPEG_MAGIC),
        };
        assert!(matches!(
            validate_attachment(&attachment),
            Err(ValidationError::MimeMismatch { .. })
        ));

        let attachment = Attachment {
            name: "fachada.jpg".to_string(),
            mime_type: "image/jpeg".to_string(),
            data: data_uri("image/jpeg", JPEG_MAGIC),
        };
        assert!(validate_attachment(&attachment).is_ok());
    }

    #[test]
    fn test_attachment_without_signature_is_accepted() {
        // Plain text has no magic bytes; the declared type is trusted.
        let attachment = Attachment {
            name: "notas.txt".to_string(),
            mime_type: "text/plain".to_string(),
            data: data_uri("text/plain", b"observacao de campo"),
        };
        assert!(validate_attachment(&attachment).is_ok());
    }

    #[test]
    fn test_photo_url_schemes() {
        let ok_data = AddPhoto {
            url: data_uri("image/jpeg", JPEG_MAGIC),
            name: "fachada.jpg".to_string(),
        };
        assert!(validate_photo(&ok_data).is_ok());

        let ok_http = AddPhoto {
            url: "https://storage.example.com/fotos/1.jpg".to_string(),
            name: "fachada.jpg".to_string(),
        };
        assert!(validate_photo(&ok_http).is_ok());

        let bad = AddPhoto {
            url: "ftp://storage.example.com/fotos/1.jpg".to_string(),
            name: "fachada.jpg".to_string(),
        };
        assert!(matches!(
            validate_photo(&bad),
            Err(ValidationError::InvalidPhotoUrl)
        ));
    }

    #[test]
    fn test_follow_up_requires_notes() {
        let input = AddFollowUp {
            date: chrono::NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            notes: " ".to_string(),
        };
        assert!(matches!(
            validate_follow_up(&input),
            Err(ValidationError::Required { .. })
        ));
    }
}
