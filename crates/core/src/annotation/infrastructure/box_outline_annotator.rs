use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::shared::constants::ANNOTATION_COLOR;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Draws a rectangle outline around each face.
///
/// Boxes are clamped to the frame first, so faces cut off at an edge get a
/// closed outline along the border.
pub struct BoxOutlineAnnotator {
    color: [u8; 3],
    thickness: u32,
}

impl BoxOutlineAnnotator {
    pub fn new(color: [u8; 3], thickness: u32) -> Self {
        Self {
            color,
            thickness: thickness.max(1),
        }
    }
}

impl Default for BoxOutlineAnnotator {
    fn default() -> Self {
        Self::new(ANNOTATION_COLOR, 1)
    }
}

impl FrameAnnotator for BoxOutlineAnnotator {
    fn annotate(&self, frame: &mut Frame, faces: &[FaceBox]) {
        for face in faces {
            let b = face.clamp_to(frame.width(), frame.height());
            if b.is_empty() {
                continue;
            }
            let (x1, y1) = (b.x as u32, b.y as u32);
            let (x2, y2) = ((b.right() - 1) as u32, (b.bottom() - 1) as u32);

            for t in 0..self.thickness {
                for x in x1..=x2 {
                    frame.put_pixel(x, y1.saturating_add(t).min(y2), self.color);
                    frame.put_pixel(x, y2.saturating_sub(t).max(y1), self.color);
                }
                for y in y1..=y2 {
                    frame.put_pixel(x1.saturating_add(t).min(x2), y, self.color);
                    frame.put_pixel(x2.saturating_sub(t).max(x1), y, self.color);
                }
            }
        }
    }
}
