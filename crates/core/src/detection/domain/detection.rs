/// Axis-aligned face box in the coordinate space of the frame it was
/// detected in.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl FaceBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn iou(&self, other: &FaceBox) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = (self.x + self.width).min(other.x + other.width);
        let iy2 = (self.y + self.height).min(other.y + other.height);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}

/// One detected face. Detections carry no identity across frames.
#[derive(Clone, Debug, PartialEq)]
pub struct Detection {
    pub bbox: FaceBox,
    pub score: f64,
}

/// Untrusted detector output, before shape validation.
#[derive(Clone, Debug, PartialEq)]
pub struct RawDetection {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub score: f64,
}

impl Detection {
    pub fn new(bbox: FaceBox, score: f64) -> Self {
        Self { bbox, score }
    }

    /// Accepts a raw detection only if every component is finite and the
    /// box has positive extent.
    pub fn from_raw(raw: &RawDetection) -> Option<Self> {
        let components = [raw.x, raw.y, raw.width, raw.height, raw.score];
        if components.iter().any(|v| !v.is_finite()) {
            return None;
        }
        if raw.width <= 0.0 || raw.height <= 0.0 {
            return None;
        }
        Some(Self {
            bbox: FaceBox::new(raw.x, raw.y, raw.width, raw.height),
            score: raw.score,
        })
    }
}
