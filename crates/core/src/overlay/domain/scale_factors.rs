/// Ratio between the canvas resolution and the coordinate space detections
/// were produced in. Axes scale independently.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    pub const IDENTITY: ScaleFactors = ScaleFactors { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Factors mapping `source` dimensions onto `target` dimensions, or
    /// `None` while the source has no size yet (e.g. video not started).
    pub fn between(target: (u32, u32), source: (u32, u32)) -> Option<Self> {
        if source.0 == 0 || source.1 == 0 {
            return None;
        }
        Some(Self {
            x: target.0 as f64 / source.0 as f64,
            y: target.1 as f64 / source.1 as f64,
        })
    }
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self::IDENTITY
    }
}
