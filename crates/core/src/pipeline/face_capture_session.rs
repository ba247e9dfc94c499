use std::sync::Arc;

use crossbeam_channel::Sender;
use serde_json::Value;
use thiserror::Error;

use crate::capture::domain::encoded_image::EncodedImage;
use crate::capture::domain::verification_payload::{to_form_payload, VerificationPayload};
use crate::capture::domain::video_source::VideoSource;
use crate::capture::infrastructure::jpeg_capture_service::{CaptureError, JpegCaptureService};
use crate::detection::domain::detect_outcome::DetectOutcome;
use crate::detection::domain::face_detector::DetectorFactory;
use crate::detection::infrastructure::onnx_tiny_face_detector::OnnxDetectorFactory;
use crate::model::domain::model_fetcher::ModelFetcher;
use crate::model::domain::model_state::ModelState;
use crate::model::infrastructure::model_resolver::ResolvingFetcher;
use crate::overlay::domain::canvas::Canvas;
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::overlay::domain::scale_factors::ScaleFactors;
use crate::pipeline::detection_engine::DetectionEngine;
use crate::pipeline::model_loader::ModelLoader;
use crate::shared::config::CaptureConfig;
use crate::shared::frame::Frame;
use crate::shared::notifier::Notifier;
use crate::verification::domain::verify_error::VerifyError;
use crate::verification::infrastructure::http_verification_client::VerificationClient;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Capture(#[from] CaptureError),
    #[error(transparent)]
    Verify(#[from] VerifyError),
}

/// One face-capture session: owns the model, the detector built from it
/// and the service endpoints. Nothing here is shared between sessions.
pub struct FaceCaptureSession {
    loader: ModelLoader,
    engine: DetectionEngine,
    renderer: OverlayRenderer,
    capture: JpegCaptureService,
    client: VerificationClient,
    notifier: Arc<dyn Notifier>,
    mirror: bool,
}

impl FaceCaptureSession {
    pub fn new(
        config: &CaptureConfig,
        fetcher: Box<dyn ModelFetcher>,
        factory: Box<dyn DetectorFactory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            loader: ModelLoader::new(config.models.clone(), fetcher, factory, notifier.clone()),
            engine: DetectionEngine::new(),
            renderer: OverlayRenderer::new(),
            capture: JpegCaptureService::new(),
            client: VerificationClient::new(&config.api_base_url),
            notifier,
            mirror: config.mirror,
        }
    }

    /// Session backed by the filesystem/HTTP model fetcher and ONNX Runtime.
    pub fn from_config(config: &CaptureConfig, notifier: Arc<dyn Notifier>) -> Self {
        Self::new(
            config,
            Box::new(ResolvingFetcher),
            Box::new(OnnxDetectorFactory),
            notifier,
        )
    }

    pub fn load_model(&mut self, progress: Option<&Sender<u8>>) -> bool {
        let loaded = self.loader.load(progress);
        if let Some(detector) = self.loader.take_detector() {
            self.engine.install(detector);
        }
        loaded
    }

    pub fn model_state(&self) -> ModelState {
        self.loader.state()
    }

    pub fn detect(&mut self, frame: &Frame) -> DetectOutcome {
        self.engine.detect(frame)
    }

    /// One tick of the live feedback loop: detect on the current frame and
    /// redraw the guide scaled from video space to `canvas`.
    ///
    /// The canvas is left untouched when no frame could be read.
    pub fn track(&mut self, source: &mut dyn VideoSource, canvas: &mut dyn Canvas) -> DetectOutcome {
        let frame = match source.current_frame() {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("No frame available for detection: {e}");
                return DetectOutcome::Failed(e.to_string());
            }
        };

        let outcome = self.engine.detect(&frame);
        let scale = ScaleFactors::between(
            (canvas.width(), canvas.height()),
            (frame.width(), frame.height()),
        )
        .unwrap_or_default();
        self.renderer.render(Some(canvas), Some(outcome.faces()), scale);
        outcome
    }

    pub fn capture(&self, source: &mut dyn VideoSource) -> Result<EncodedImage, CaptureError> {
        self.capture.capture(source, self.mirror)
    }

    /// Captures the current frame and submits it for verification.
    ///
    /// Failures are reported through the notifier before being returned.
    pub fn verify_capture(&self, source: &mut dyn VideoSource) -> Result<Value, SessionError> {
        let result = self.capture_and_send(source, |client, payload| client.verify(payload));
        if let Err(e) = &result {
            self.notifier.error(&format!("Face verification failed: {e}"));
        }
        result
    }

    pub fn enroll_capture(
        &self,
        source: &mut dyn VideoSource,
        bearer_token: &str,
    ) -> Result<Value, SessionError> {
        let result = self.capture_and_send(source, |client, payload| {
            client.enroll(payload, bearer_token)
        });
        if let Err(e) = &result {
            self.notifier.error(&format!("Face enrollment failed: {e}"));
        }
        result
    }

    fn capture_and_send(
        &self,
        source: &mut dyn VideoSource,
        send: impl FnOnce(&VerificationClient, &VerificationPayload) -> Result<Value, VerifyError>,
    ) -> Result<Value, SessionError> {
        let image = self.capture(source)?;
        let payload = to_form_payload(image.as_str(), None).map_err(VerifyError::from)?;
        Ok(send(&self.client, &payload)?)
    }
}
