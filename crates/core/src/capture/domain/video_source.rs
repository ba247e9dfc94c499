use crate::shared::frame::Frame;

/// A live (or simulated) video feed that can be snapshotted.
pub trait VideoSource: Send {
    /// Intrinsic stream resolution, independent of how it is displayed.
    fn native_size(&self) -> (u32, u32);

    /// The frame currently being shown.
    fn current_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;
}
