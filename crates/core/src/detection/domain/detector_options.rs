#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetectorVariant {
    Tiny,
}

/// Inference parameters. The engine uses one fixed instance for every call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorOptions {
    pub variant: DetectorVariant,
    /// Square model input resolution in pixels.
    pub input_size: u32,
    pub score_threshold: f64,
    pub nms_iou_threshold: f64,
}

impl DetectorOptions {
    pub const fn tiny() -> Self {
        Self {
            variant: DetectorVariant::Tiny,
            input_size: 128,
            score_threshold: 0.5,
            nms_iou_threshold: 0.3,
        }
    }
}

impl Default for DetectorOptions {
    fn default() -> Self {
        Self::tiny()
    }
}
