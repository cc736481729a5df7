use ndarray::ArrayView3;

/// Number of interleaved channels in every captured frame (RGB).
pub const RGB_CHANNELS: u8 = 3;

/// A single captured frame: contiguous RGB bytes in row-major order.
///
/// Frames live for one sampling iteration only. Format conversion happens
/// in the capture adapter; everything downstream sees packed RGB24.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * RGB_CHANNELS as usize,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            index,
        }
    }

    /// A frame filled with a single color. Mostly useful for tests and
    /// synthetic sources.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * RGB_CHANNELS as usize)
            .collect();
        Self::new(data, width, height, index)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Position of this frame in capture order, starting at 0.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let offset = self.offset(x, y)?;
        Some([
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ])
    }

    /// Writes one pixel. Out-of-bounds coordinates are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if let Some(offset) = self.offset(x, y) {
            self.data[offset..offset + 3].copy_from_slice(&rgb);
        }
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(
            (
                self.height as usize,
                self.width as usize,
                RGB_CHANNELS as usize,
            ),
            &self.data,
        )
        .expect("Frame data length must match dimensions")
    }

    fn offset(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(((y as usize) * (self.width as usize) + x as usize) * RGB_CHANNELS as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_and_accessors() {
        let data = vec![0u8; 12]; // 2x2x3
        let frame = Frame::new(data.clone(), 2, 2, 5);
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.index(), 5);
        assert_eq!(frame.data(), &data[..]);
    }

    #[test]
    fn test_filled_repeats_color() {
        let frame = Frame::filled(3, 2, [10, 20, 30], 0);
        assert_eq!(frame.data().len(), 18);
        assert_eq!(frame.pixel(2, 1), Some([10, 20, 30]));
    }

    #[test]
    fn test_put_pixel_writes_rgb_triplet() {
        let mut frame = Frame::filled(4, 4, [0, 0, 0], 0);
        frame.put_pixel(1, 2, [255, 128, 1]);
        assert_eq!(frame.pixel(1, 2), Some([255, 128, 1]));
        assert_eq!(frame.pixel(2, 1), Some([0, 0, 0]));
    }

    #[test]
    fn test_put_pixel_out_of_bounds_is_ignored() {
        let mut frame = Frame::filled(2, 2, [7, 7, 7], 0);
        frame.put_pixel(2, 0, [255, 255, 255]);
        frame.put_pixel(0, 5, [255, 255, 255]);
        assert!(frame.data().iter().all(|&b| b == 7));
        assert_eq!(frame.pixel(2, 0), None);
    }

    #[test]
    fn test_clone_is_independent() {
        let frame = Frame::filled(2, 2, [100, 100, 100], 0);
        let mut cloned = frame.clone();
        cloned.put_pixel(0, 0, [0, 0, 0]);
        assert_eq!(frame.pixel(0, 0), Some([100, 100, 100]));
        assert_eq!(cloned.pixel(0, 0), Some([0, 0, 0]));
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * 3")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 10], 2, 2, 0);
    }

    #[test]
    fn test_as_ndarray_shape_and_access() {
        let mut frame = Frame::filled(4, 2, [0, 0, 0], 0);
        frame.put_pixel(0, 1, [255, 0, 0]);
        let arr = frame.as_ndarray();
        assert_eq!(arr.shape(), &[2, 4, 3]); // (height, width, channels)
        assert_eq!(arr[[1, 0, 0]], 255);
        assert_eq!(arr[[1, 0, 1]], 0);
    }
}
