use crate::detection::domain::detect_outcome::DetectOutcome;
use crate::detection::domain::detection::Detection;
use crate::detection::domain::detector_options::DetectorOptions;
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;

/// Runs per-frame detection with a fixed detector configuration.
///
/// Holds the session's detector handle; until one is installed every call
/// reports [`DetectOutcome::NotLoaded`]. Nothing from a call is retained.
pub struct DetectionEngine {
    detector: Option<Box<dyn FaceDetector>>,
    options: DetectorOptions,
}

impl DetectionEngine {
    pub fn new() -> Self {
        Self {
            detector: None,
            options: DetectorOptions::tiny(),
        }
    }

    pub fn with_detector(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector: Some(detector),
            options: DetectorOptions::tiny(),
        }
    }

    pub fn install(&mut self, detector: Box<dyn FaceDetector>) {
        self.detector = Some(detector);
    }

    pub fn is_loaded(&self) -> bool {
        self.detector.is_some()
    }

    pub fn options(&self) -> &DetectorOptions {
        &self.options
    }

    /// Detects faces in `frame`. Never fails: misses are reported in the
    /// outcome and read as an empty face list.
    pub fn detect(&mut self, frame: &Frame) -> DetectOutcome {
        let Some(detector) = self.detector.as_mut() else {
            return DetectOutcome::NotLoaded;
        };
        if frame.is_empty() {
            log::debug!("Skipping detection on zero-sized frame {}", frame.index());
            return DetectOutcome::Failed("zero-sized frame".to_string());
        }

        match detector.detect(frame, &self.options) {
            Ok(raw) => {
                let total = raw.len();
                let faces: Vec<Detection> = raw.iter().filter_map(Detection::from_raw).collect();
                if faces.len() < total {
                    log::debug!(
                        "Dropped {} malformed detections on frame {}",
                        total - faces.len(),
                        frame.index()
                    );
                }
                DetectOutcome::Faces(faces)
            }
            Err(e) => {
                log::debug!("Detection failed on frame {}: {e}", frame.index());
                DetectOutcome::Failed(e.to_string())
            }
        }
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::new()
    }
}
