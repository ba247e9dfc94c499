use std::path::Path;

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::overlay::domain::canvas::{Canvas, Color, DrawOp, Point};

/// RGBA pixel canvas with a transparent background.
///
/// Coverage is decided per pixel center; there is no anti-aliasing.
pub struct RasterCanvas {
    image: RgbaImage,
}

impl RasterCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let Rgba([r, g, b, a]) = *self.image.get_pixel(x, y);
        Color::rgba(r, g, b, a)
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    pub fn save_png(&self, path: &Path) -> Result<(), image::ImageError> {
        self.image.save_with_format(path, image::ImageFormat::Png)
    }

    /// Blends the overlay over `base`, which must match the canvas size.
    pub fn composite_over(&self, base: &RgbImage) -> Option<RgbImage> {
        if base.dimensions() != self.image.dimensions() {
            return None;
        }
        let mut out = base.clone();
        for (dst, src) in out.pixels_mut().zip(self.image.pixels()) {
            let alpha = src.0[3] as u32;
            if alpha == 0 {
                continue;
            }
            let blend = |s: u8, d: u8| ((s as u32 * alpha + d as u32 * (255 - alpha)) / 255) as u8;
            *dst = Rgb([
                blend(src.0[0], dst.0[0]),
                blend(src.0[1], dst.0[1]),
                blend(src.0[2], dst.0[2]),
            ]);
        }
        Some(out)
    }

    /// Paints every pixel in the bounding rectangle whose center passes
    /// `covered`.
    fn paint(
        &mut self,
        min: (f64, f64),
        max: (f64, f64),
        color: Color,
        covered: impl Fn(f64, f64) -> bool,
    ) {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 {
            return;
        }
        let x0 = min.0.floor().max(0.0) as u32;
        let y0 = min.1.floor().max(0.0) as u32;
        let x1 = (max.0.ceil().max(0.0) as u32).min(w - 1);
        let y1 = (max.1.ceil().max(0.0) as u32).min(h - 1);
        let rgba = Rgba([color.r, color.g, color.b, color.a]);

        for py in y0..=y1 {
            for px in x0..=x1 {
                if covered(px as f64 + 0.5, py as f64 + 0.5) {
                    self.image.put_pixel(px, py, rgba);
                }
            }
        }
    }

    fn stroke_ellipse(&mut self, center: Point, rx: f64, ry: f64, line_width: f64, color: Color) {
        let half = line_width / 2.0;
        if rx <= 0.0 || ry <= 0.0 {
            let a = Point::new(center.x - rx.max(0.0), center.y - ry.max(0.0));
            let b = Point::new(center.x + rx.max(0.0), center.y + ry.max(0.0));
            self.stroke_segment(a, b, line_width, color);
            return;
        }
        let pad = half + 1.0;
        self.paint(
            (center.x - rx - pad, center.y - ry - pad),
            (center.x + rx + pad, center.y + ry + pad),
            color,
            |x, y| ellipse_distance(x - center.x, y - center.y, rx, ry) <= half,
        );
    }

    fn stroke_segment(&mut self, a: Point, b: Point, line_width: f64, color: Color) {
        let half = line_width / 2.0;
        self.paint(
            (a.x.min(b.x) - half, a.y.min(b.y) - half),
            (a.x.max(b.x) + half, a.y.max(b.y) + half),
            color,
            |x, y| segment_distance(Point::new(x, y), a, b) <= half,
        );
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.paint(
            (center.x - radius, center.y - radius),
            (center.x + radius, center.y + radius),
            color,
            |x, y| (x - center.x).hypot(y - center.y) <= radius,
        );
    }
}

impl Canvas for RasterCanvas {
    fn width(&self) -> u32 {
        self.image.width()
    }

    fn height(&self) -> u32 {
        self.image.height()
    }

    fn clear(&mut self) {
        for p in self.image.pixels_mut() {
            *p = Rgba([0, 0, 0, 0]);
        }
    }

    fn draw(&mut self, op: &DrawOp) {
        match op {
            DrawOp::StrokeEllipse {
                center,
                radius_x,
                radius_y,
                line_width,
                color,
            } => self.stroke_ellipse(*center, *radius_x, *radius_y, *line_width, *color),
            DrawOp::StrokePolyline {
                points,
                line_width,
                color,
            } => {
                for pair in points.windows(2) {
                    self.stroke_segment(pair[0], pair[1], *line_width, *color);
                }
            }
            DrawOp::FillCircle {
                center,
                radius,
                color,
            } => self.fill_circle(*center, *radius, *color),
        }
    }
}

/// First-order (Sampson) distance from `(dx, dy)` to the ellipse outline.
fn ellipse_distance(dx: f64, dy: f64, rx: f64, ry: f64) -> f64 {
    let f = (dx * dx) / (rx * rx) + (dy * dy) / (ry * ry) - 1.0;
    let gx = 2.0 * dx / (rx * rx);
    let gy = 2.0 * dy / (ry * ry);
    let grad = gx.hypot(gy);
    if grad == 0.0 {
        return f64::INFINITY;
    }
    f.abs() / grad
}

fn segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq == 0.0 {
        0.0
    } else {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0)
    };
    (p.x - (a.x + t * abx)).hypot(p.y - (a.y + t * aby))
}
