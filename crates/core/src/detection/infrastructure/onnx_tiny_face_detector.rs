//! Tiny face detector running an anchor-based ONNX model through `ort`.
//!
//! The expected model is a BlazeFace short-range export: a 128x128 RGB
//! input and two outputs, regressors `[1, 896, 16]` (box deltas plus
//! keypoints) and raw scores `[1, 896, 1]`, one row per anchor. Other
//! "tiny" face models (e.g. tiny-YOLO exports) have a different output
//! layout and decode to garbage here.

use crate::detection::domain::detection::RawDetection;
use crate::detection::domain::detector_options::DetectorOptions;
use crate::detection::domain::face_detector::{DetectorFactory, FaceDetector};
use crate::shared::frame::Frame;

use super::math::{nms, sigmoid};

/// Values per anchor in the regressor output.
const REGRESSOR_STRIDE: usize = 16;

/// `(stride, anchors_per_cell)` for each feature map.
const FEATURE_MAPS: [(u32, usize); 2] = [(8, 2), (16, 6)];

pub struct OnnxTinyFaceDetector {
    session: ort::session::Session,
    anchors: Vec<[f32; 2]>,
    anchor_input_size: u32,
}

impl OnnxTinyFaceDetector {
    pub fn from_memory(model: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        let session = ort::session::Session::builder()?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)?
            .with_execution_providers(platform_execution_providers())?
            .commit_from_memory(model)?;
        let input_size = DetectorOptions::tiny().input_size;
        Ok(Self {
            session,
            anchors: generate_anchors(input_size),
            anchor_input_size: input_size,
        })
    }
}

impl FaceDetector for OnnxTinyFaceDetector {
    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectorOptions,
    ) -> Result<Vec<RawDetection>, Box<dyn std::error::Error>> {
        if frame.is_empty() {
            return Err("cannot run detection on a zero-sized frame".into());
        }
        if options.input_size != self.anchor_input_size {
            self.anchors = generate_anchors(options.input_size);
            self.anchor_input_size = options.input_size;
        }

        let fw = frame.width() as f32;
        let fh = frame.height() as f32;
        let size = options.input_size as f32;

        let input_tensor = preprocess(frame, options.input_size)?;
        let input_value = ort::value::Tensor::from_array(input_tensor)?;
        let outputs = self.session.run(ort::inputs![input_value])?;

        if outputs.len() < 2 {
            return Err(format!("face model expected 2 outputs, got {}", outputs.len()).into());
        }

        let regressors = outputs[0].try_extract_array::<f32>()?;
        let scores = outputs[1].try_extract_array::<f32>()?;
        let reg_data = regressors.as_slice().ok_or("regressor output is not contiguous")?;
        let score_data = scores.as_slice().ok_or("score output is not contiguous")?;

        let mut raw_dets = Vec::new();
        for (i, &raw_score) in score_data.iter().enumerate().take(self.anchors.len()) {
            let score = sigmoid(raw_score);
            if (score as f64) < options.score_threshold {
                continue;
            }

            let offset = i * REGRESSOR_STRIDE;
            if offset + 4 > reg_data.len() {
                break;
            }

            let anchor = self.anchors[i];
            let cx = anchor[0] + reg_data[offset] / size;
            let cy = anchor[1] + reg_data[offset + 1] / size;
            let w = reg_data[offset + 2] / size;
            let h = reg_data[offset + 3] / size;

            let x1 = ((cx - w / 2.0) * fw).max(0.0);
            let y1 = ((cy - h / 2.0) * fh).max(0.0);
            let x2 = ((cx + w / 2.0) * fw).min(fw);
            let y2 = ((cy + h / 2.0) * fh).min(fh);

            raw_dets.push(RawDetection {
                x: x1 as f64,
                y: y1 as f64,
                width: (x2 - x1) as f64,
                height: (y2 - y1) as f64,
                score: score as f64,
            });
        }

        Ok(nms(raw_dets, options.nms_iou_threshold))
    }
}

/// Builds [`OnnxTinyFaceDetector`]s from fetched model bytes.
pub struct OnnxDetectorFactory;

impl DetectorFactory for OnnxDetectorFactory {
    fn build(&self, model: &[u8]) -> Result<Box<dyn FaceDetector>, Box<dyn std::error::Error>> {
        Ok(Box::new(OnnxTinyFaceDetector::from_memory(model)?))
    }
}

/// CoreML on macOS, DirectML on Windows. ORT falls back to CPU when the
/// accelerator is unavailable.
fn platform_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[cfg(target_os = "macos")]
    return vec![ort::execution_providers::CoreMLExecutionProvider::default().build()];
    #[cfg(target_os = "windows")]
    return vec![ort::execution_providers::DirectMLExecutionProvider::default().build()];
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    Vec::new()
}

/// Nearest-neighbour resize to `size × size`, normalized to [0,1], NCHW.
fn preprocess(frame: &Frame, size: u32) -> Result<ndarray::Array4<f32>, Box<dyn std::error::Error>> {
    let src = frame
        .as_ndarray()
        .ok_or("frame data does not match its dimensions")?;
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    let s = size as usize;

    let mut tensor = ndarray::Array4::<f32>::zeros((1, 3, s, s));
    for y in 0..s {
        let src_y = (((y as f64 + 0.5) * src_h as f64 / s as f64) as usize).min(src_h - 1);
        for x in 0..s {
            let src_x = (((x as f64 + 0.5) * src_w as f64 / s as f64) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, y, x]] = src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }
    Ok(tensor)
}

/// Anchor centers in normalized coordinates, one per (cell, anchor) pair.
fn generate_anchors(input_size: u32) -> Vec<[f32; 2]> {
    let mut anchors = Vec::new();
    for &(stride, per_cell) in &FEATURE_MAPS {
        let grid = (input_size / stride) as usize;
        for y in 0..grid {
            for x in 0..grid {
                let cx = (x as f32 + 0.5) / grid as f32;
                let cy = (y as f32 + 0.5) / grid as f32;
                for _ in 0..per_cell {
                    anchors.push([cx, cy]);
                }
            }
        }
    }
    anchors
}
