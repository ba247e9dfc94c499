use crate::detection::domain::detection::{Detection, FaceBox};
use crate::overlay::domain::canvas::{Canvas, Color, DrawOp, Point};
use crate::overlay::domain::scale_factors::ScaleFactors;

pub const ACCENT_COLOR: Color = Color::rgb(0x00, 0xff, 0x00);
pub const STROKE_WIDTH: f64 = 3.0;
/// Arm length of each L-shaped corner bracket, in canvas pixels.
pub const CORNER_ARM: f64 = 10.0;
pub const CENTER_DOT_RADIUS: f64 = 4.0;

/// Ellipse fitted to one scaled face box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuideGeometry {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
}

impl GuideGeometry {
    /// Scales each box component on its own axis, then fits the ellipse.
    pub fn from_box(bbox: &FaceBox, scale: ScaleFactors) -> Self {
        let x = bbox.x * scale.x;
        let y = bbox.y * scale.y;
        let width = bbox.width * scale.x;
        let height = bbox.height * scale.y;
        Self {
            center: Point::new(x + width / 2.0, y + height / 2.0),
            radius_x: width / 2.0,
            radius_y: height / 2.0,
        }
    }
}

/// Draws the face guide: ellipse outline, corner brackets and center dot
/// for every detection.
#[derive(Default)]
pub struct OverlayRenderer;

impl OverlayRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Clears `canvas` and draws one guide per detection.
    ///
    /// Does nothing when either the canvas or the detections are missing.
    /// An empty detection slice leaves a blank canvas.
    pub fn render(
        &self,
        canvas: Option<&mut dyn Canvas>,
        detections: Option<&[Detection]>,
        scale: ScaleFactors,
    ) {
        let (Some(canvas), Some(detections)) = (canvas, detections) else {
            return;
        };

        canvas.clear();
        for detection in detections {
            for op in guide_ops(&GuideGeometry::from_box(&detection.bbox, scale)) {
                canvas.draw(&op);
            }
        }
    }
}

/// Primitives for one guide: the ellipse, four corner brackets, the dot.
pub fn guide_ops(guide: &GuideGeometry) -> Vec<DrawOp> {
    let Point { x: cx, y: cy } = guide.center;
    let (rx, ry) = (guide.radius_x, guide.radius_y);
    let (left, right, top, bottom) = (cx - rx, cx + rx, cy - ry, cy + ry);

    let bracket = |points: [(f64, f64); 3]| DrawOp::StrokePolyline {
        points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        line_width: STROKE_WIDTH,
        color: ACCENT_COLOR,
    };

    vec![
        DrawOp::StrokeEllipse {
            center: guide.center,
            radius_x: rx,
            radius_y: ry,
            line_width: STROKE_WIDTH,
            color: ACCENT_COLOR,
        },
        bracket([(left, top + CORNER_ARM), (left, top), (left + CORNER_ARM, top)]),
        bracket([(right - CORNER_ARM, top), (right, top), (right, top + CORNER_ARM)]),
        bracket([(left, bottom - CORNER_ARM), (left, bottom), (left + CORNER_ARM, bottom)]),
        bracket([(right - CORNER_ARM, bottom), (right, bottom), (right, bottom - CORNER_ARM)]),
        DrawOp::FillCircle {
            center: guide.center,
            radius: CENTER_DOT_RADIUS,
            color: ACCENT_COLOR,
        },
    ]
}
