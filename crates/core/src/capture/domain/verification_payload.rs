use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::shared::constants::{DEFAULT_IMAGE_FILENAME, IMAGE_FIELD_NAME, JPEG_MIME};

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("encoded image is not a data URI")]
    NotDataUri,
    #[error("data URI is not base64 encoded")]
    NotBase64,
    #[error("invalid base64 image body: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("encoded image has no content")]
    Empty,
}

/// Multipart body for one verification attempt: a single binary JPEG
/// field named `image`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationPayload {
    pub field_name: &'static str,
    pub filename: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Decodes a base64 data URI into the binary multipart payload.
///
/// `filename` defaults to `image.jpg`. The content type is always JPEG.
pub fn to_form_payload(
    encoded: &str,
    filename: Option<&str>,
) -> Result<VerificationPayload, PayloadError> {
    let (header, body) = encoded.split_once(',').ok_or(PayloadError::NotDataUri)?;
    if !header.starts_with("data:") {
        return Err(PayloadError::NotDataUri);
    }
    if !header.ends_with(";base64") {
        return Err(PayloadError::NotBase64);
    }

    let bytes = STANDARD.decode(body.trim())?;
    if bytes.is_empty() {
        return Err(PayloadError::Empty);
    }

    Ok(VerificationPayload {
        field_name: IMAGE_FIELD_NAME,
        filename: filename.unwrap_or(DEFAULT_IMAGE_FILENAME).to_string(),
        mime: JPEG_MIME,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::domain::encoded_image::EncodedImage;
    use rstest::rstest;

    #[test]
    fn test_decodes_data_uri_with_default_filename() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(2000).collect();
        let encoded = EncodedImage::from_jpeg(&bytes);

        let payload = to_form_payload(encoded.as_str(), None).unwrap();
        assert_eq!(payload.bytes, bytes);
        assert_eq!(payload.field_name, "image");
        assert_eq!(payload.filename, "image.jpg");
        assert_eq!(payload.mime, "image/jpeg");
    }

    #[test]
    fn test_custom_filename() {
        let payload = to_form_payload("data:image/jpeg;base64,/9j/", Some("face.jpg")).unwrap();
        assert_eq!(payload.filename, "face.jpg");
        assert_eq!(payload.bytes, vec![0xff, 0xd8, 0xff]);
    }

    #[test]
    fn test_any_image_mime_is_sent_as_jpeg() {
        let payload = to_form_payload("data:image/png;base64,AAEC", None).unwrap();
        assert_eq!(payload.mime, "image/jpeg");
        assert_eq!(payload.bytes, vec![0, 1, 2]);
    }

    #[rstest]
    #[case::no_comma("just-some-text")]
    #[case::no_data_scheme("image/jpeg;base64,AAEC")]
    fn test_rejects_non_data_uri(#[case] input: &str) {
        assert!(matches!(to_form_payload(input, None), Err(PayloadError::NotDataUri)));
    }

    #[test]
    fn test_rejects_non_base64_uri() {
        assert!(matches!(
            to_form_payload("data:text/plain,hello", None),
            Err(PayloadError::NotBase64)
        ));
    }

    #[test]
    fn test_rejects_bad_base64() {
        assert!(matches!(
            to_form_payload("data:image/jpeg;base64,@@@", None),
            Err(PayloadError::Base64(_))
        ));
    }

    #[test]
    fn test_rejects_empty_body() {
        assert!(matches!(
            to_form_payload("data:image/jpeg;base64,", None),
            Err(PayloadError::Empty)
        ));
    }
}
