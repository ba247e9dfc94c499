use crate::detection::domain::detection::RawDetection;
use crate::detection::domain::detector_options::DetectorOptions;
use crate::shared::frame::Frame;

/// Domain interface for a face detection backend.
///
/// Output is untrusted; the detection engine validates it.
pub trait FaceDetector: Send {
    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectorOptions,
    ) -> Result<Vec<RawDetection>, Box<dyn std::error::Error>>;
}

/// Builds a detector from fetched model bytes.
///
/// A model the backend refuses counts as a failed load of that source.
pub trait DetectorFactory: Send {
    fn build(&self, model: &[u8]) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>>;
}
