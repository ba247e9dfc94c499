use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::capture::domain::encoded_image::EncodedImage;
use crate::capture::domain::video_source::VideoSource;
use crate::shared::constants::JPEG_QUALITY;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("video has no frame yet ({width}x{height})")]
    ZeroDimensions { width: u32, height: u32 },
    #[error("failed to read frame from video source: {0}")]
    Source(String),
    #[error("frame pixel data does not match its dimensions")]
    InvalidFrame,
    #[error("failed to encode JPEG: {0}")]
    Encode(#[from] image::ImageError),
}

/// Snapshots a video source into a JPEG data URI.
///
/// The capture surface always has the source's native resolution;
/// quality is fixed.
#[derive(Default)]
pub struct JpegCaptureService;

impl JpegCaptureService {
    pub fn new() -> Self {
        Self
    }

    pub fn capture(
        &self,
        source: &mut dyn VideoSource,
        mirror: bool,
    ) -> Result<EncodedImage, CaptureError> {
        let (width, height) = source.native_size();
        if width == 0 || height == 0 {
            return Err(CaptureError::ZeroDimensions { width, height });
        }

        let frame = source
            .current_frame()
            .map_err(|e| CaptureError::Source(e.to_string()))?;
        if frame.is_empty() {
            return Err(CaptureError::ZeroDimensions {
                width: frame.width(),
                height: frame.height(),
            });
        }
        let pixels = frame.to_rgb_image().ok_or(CaptureError::InvalidFrame)?;

        let mut surface = if pixels.dimensions() == (width, height) {
            pixels
        } else {
            imageops::resize(&pixels, width, height, FilterType::Triangle)
        };
        if mirror {
            imageops::flip_horizontal_in_place(&mut surface);
        }

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).write_image(
            surface.as_raw(),
            width,
            height,
            ExtendedColorType::Rgb8,
        )?;
        log::debug!(
            "Captured frame {} at {width}x{height} ({} bytes, mirror={mirror})",
            frame.index(),
            jpeg.len()
        );

        Ok(EncodedImage::from_jpeg(&jpeg))
    }
}
