#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }
}

/// One primitive of the overlay, in canvas pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    StrokeEllipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
        line_width: f64,
        color: Color,
    },
    StrokePolyline {
        points: Vec<Point>,
        line_width: f64,
        color: Color,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
}

/// Drawing surface the overlay renders onto.
pub trait Canvas {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Resets every pixel to the transparent background.
    fn clear(&mut self);
    fn draw(&mut self, op: &DrawOp);
}
