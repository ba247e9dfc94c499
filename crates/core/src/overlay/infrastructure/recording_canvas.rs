use crate::overlay::domain::canvas::{Canvas, DrawOp};

/// Canvas that keeps the draw operations instead of pixels.
///
/// Its content is exactly the ops drawn since the last `clear`.
pub struct RecordingCanvas {
    width: u32,
    height: u32,
    ops: Vec<DrawOp>,
    clears: usize,
}

impl RecordingCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            clears: 0,
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn is_blank(&self) -> bool {
        self.ops.is_empty()
    }

    /// How many times the canvas has been cleared.
    pub fn clears(&self) -> usize {
        self.clears
    }
}

impl Canvas for RecordingCanvas {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn draw(&mut self, op: &DrawOp) {
        self.ops.push(op.clone());
    }
}
