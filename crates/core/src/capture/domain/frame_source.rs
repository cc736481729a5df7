use crate::shared::frame::Frame;

/// Live source of frames, typically a camera.
///
/// The sampling loop owns its source exclusively and calls `release` exactly
/// once, when it exits.
pub trait FrameSource: Send {
    /// Blocks until the next frame is available.
    ///
    /// An error means the source can no longer produce frames; callers must
    /// not retry with stale data.
    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>>;

    /// Nominal capture rate in frames per second, as reported by the device.
    fn nominal_fps(&self) -> u32;

    /// Releases the underlying device.
    fn release(&mut self);
}
