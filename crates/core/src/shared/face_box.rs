/// Axis-aligned bounding box of one detected face, in frame pixels.
///
/// `(x, y)` is the top-left corner. The detection result for a frame is an
/// ordered `Vec<FaceBox>`; its length is the face count that drives reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceBox {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl FaceBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Builds a box from corner coordinates, rounding to whole pixels.
    ///
    /// Out-of-range or non-finite coordinates saturate at the `i32` bounds
    /// (NaN becomes 0), so any model output yields a box that clamps cleanly.
    pub fn from_corners(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        let x = x1.round() as i32;
        let y = y1.round() as i32;
        Self {
            x,
            y,
            width: (x2.round() as i32).saturating_sub(x).max(0),
            height: (y2.round() as i32).saturating_sub(y).max(0),
        }
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersects the box with a `frame_w` x `frame_h` frame.
    pub fn clamp_to(&self, frame_w: u32, frame_h: u32) -> FaceBox {
        let fw = frame_w as i32;
        let fh = frame_h as i32;
        let x1 = self.x.clamp(0, fw);
        let y1 = self.y.clamp(0, fh);
        let x2 = self.right().clamp(0, fw);
        let y2 = self.bottom().clamp(0, fh);
        FaceBox {
            x: x1,
            y: y1,
            width: (x2 - x1).max(0),
            height: (y2 - y1).max(0),
        }
    }

    pub fn iou(&self, other: &FaceBox) -> f64 {
        let ix1 = self.x.max(other.x);
        let iy1 = self.y.max(other.y);
        let ix2 = self.right().min(other.right());
        let iy2 = self.bottom().min(other.bottom());

        let inter = (ix2 - ix1).max(0) as f64 * (iy2 - iy1).max(0) as f64;
        if inter == 0.0 {
            return 0.0;
        }

        let area_a = self.width as f64 * self.height as f64;
        let area_b = other.width as f64 * other.height as f64;
        inter / (area_a + area_b - inter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_from_corners_rounds_and_sizes() {
        let b = FaceBox::from_corners(10.4, 20.6, 50.5, 61.2);
        assert_eq!(b, FaceBox::new(10, 21, 41, 40));
    }

    #[test]
    fn test_from_corners_inverted_is_empty() {
        let b = FaceBox::from_corners(50.0, 50.0, 10.0, 10.0);
        assert!(b.is_empty());
    }

    #[test]
    fn test_from_corners_extreme_values_saturate() {
        let b = FaceBox::from_corners(-5.0, -3.0, f64::INFINITY, 1e12);
        assert_eq!(b.x, -5);
        assert_eq!(b.width, i32::MAX);
        assert_eq!(b.height, i32::MAX);
        assert_eq!(b.clamp_to(100, 80), FaceBox::new(0, 0, 100, 80));
    }

    #[test]
    fn test_from_corners_far_negative_corner_does_not_overflow() {
        let b = FaceBox::from_corners(f64::NEG_INFINITY, 0.0, 10.0, 10.0);
        assert_eq!(b.width, i32::MAX);
        assert_eq!(b.right(), -1);
    }

    #[test]
    fn test_from_corners_nan_is_empty() {
        let b = FaceBox::from_corners(f64::NAN, 10.0, f64::NAN, 20.0);
        assert!(b.is_empty());
    }

    #[test]
    fn test_clamp_inside_frame_is_identity() {
        let b = FaceBox::new(10, 10, 20, 20);
        assert_eq!(b.clamp_to(100, 100), b);
    }

    #[test]
    fn test_clamp_crops_at_edges() {
        let b = FaceBox::new(-10, 90, 30, 30);
        assert_eq!(b.clamp_to(100, 100), FaceBox::new(0, 90, 20, 10));
    }

    #[test]
    fn test_clamp_fully_outside_is_empty() {
        let b = FaceBox::new(200, 200, 10, 10);
        assert!(b.clamp_to(100, 100).is_empty());
    }

    #[test]
    fn test_iou_identical() {
        let a = FaceBox::new(10, 10, 100, 100);
        assert_relative_eq!(a.iou(&a), 1.0);
    }

    #[test]
    fn test_iou_partial_overlap() {
        // intersection 50*100 = 5000, union 15000
        let a = FaceBox::new(0, 0, 100, 100);
        let b = FaceBox::new(50, 0, 100, 100);
        assert_relative_eq!(a.iou(&b), 5000.0 / 15000.0);
    }

    #[rstest]
    #[case::disjoint(FaceBox::new(0, 0, 50, 50), FaceBox::new(100, 100, 50, 50))]
    #[case::touching(FaceBox::new(0, 0, 50, 50), FaceBox::new(50, 0, 50, 50))]
    #[case::zero_width(FaceBox::new(0, 0, 0, 100), FaceBox::new(0, 0, 50, 50))]
    fn test_iou_zero(#[case] a: FaceBox, #[case] b: FaceBox) {
        assert_relative_eq!(a.iou(&b), 0.0);
    }
}
