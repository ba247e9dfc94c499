use std::path::Path;

use image::RgbImage;

use crate::capture::domain::video_source::VideoSource;
use crate::shared::frame::Frame;

/// Adapts a single image to the [`VideoSource`] interface.
///
/// Every snapshot returns the same pixels; the frame index still advances
/// so callers can tell snapshots apart.
pub struct StillImageSource {
    image: RgbImage,
    next_index: usize,
}

impl StillImageSource {
    pub fn open(path: &Path) -> Result<Self, image::ImageError> {
        Ok(Self::from_image(image::open(path)?.to_rgb8()))
    }

    pub fn from_image(image: RgbImage) -> Self {
        Self {
            image,
            next_index: 0,
        }
    }
}

impl VideoSource for StillImageSource {
    fn native_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn current_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        let frame = Frame::from_rgb_image(self.image.clone(), self.next_index);
        self.next_index += 1;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_frames_repeat_with_advancing_index() {
        let mut source = StillImageSource::from_image(RgbImage::from_pixel(4, 3, Rgb([9, 9, 9])));
        assert_eq!(source.native_size(), (4, 3));

        let first = source.current_frame().unwrap();
        let second = source.current_frame().unwrap();
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(first.data(), second.data());
    }

    #[test]
    fn test_open_reads_image_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("face.png");
        RgbImage::from_pixel(8, 6, Rgb([1, 2, 3])).save(&path).unwrap();

        let mut source = StillImageSource::open(&path).unwrap();
        assert_eq!(source.native_size(), (8, 6));
        assert_eq!(&source.current_frame().unwrap().data()[..3], &[1, 2, 3]);
    }

    #[test]
    fn test_open_missing_file_fails() {
        assert!(StillImageSource::open(Path::new("/nonexistent/face.png")).is_err());
    }
}
