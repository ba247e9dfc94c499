use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::shared::constants::JPEG_MIME;

/// A captured frame as a `data:image/jpeg;base64,...` URI.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data_uri: String,
}

impl EncodedImage {
    pub fn from_jpeg(bytes: &[u8]) -> Self {
        Self {
            data_uri: format!("data:{JPEG_MIME};base64,{}", STANDARD.encode(bytes)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.data_uri
    }

    pub fn into_string(self) -> String {
        self.data_uri
    }

    pub fn is_empty(&self) -> bool {
        self.data_uri
            .split_once(',')
            .map_or(true, |(_, body)| body.is_empty())
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The payload itself is unreadable noise in logs.
        f.debug_struct("EncodedImage")
            .field("len", &self.data_uri.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_jpeg_builds_data_uri() {
        let image = EncodedImage::from_jpeg(&[0xff, 0xd8, 0xff]);
        assert_eq!(image.as_str(), "data:image/jpeg;base64,/9j/");
        assert!(!image.is_empty());
    }

    #[test]
    fn test_empty_body_is_empty() {
        assert!(EncodedImage::from_jpeg(&[]).is_empty());
    }

    #[test]
    fn test_debug_hides_payload() {
        let image = EncodedImage::from_jpeg(&[1, 2, 3]);
        let debug = format!("{image:?}");
        assert!(!debug.contains("base64"));
        assert!(debug.contains("len"));
    }
}
