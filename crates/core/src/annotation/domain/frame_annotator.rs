use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Marks detected faces on a frame before it is sent to the collector.
///
/// Implementations modify the frame in place.
pub trait FrameAnnotator: Send {
    fn annotate(&self, frame: &mut Frame, faces: &[FaceBox]);
}
