/// Selects which acquired frames go through detection: one in every `fps`,
/// starting with the first, so detection runs about once per second of video.
#[derive(Debug)]
pub struct SamplingCadence {
    interval: usize,
    frame_count: usize,
}

impl SamplingCadence {
    /// A rate of 0 samples every frame.
    pub fn new(fps: u32) -> Self {
        Self {
            interval: fps.max(1) as usize,
            frame_count: 0,
        }
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Advances past one acquired frame and returns whether it is sampled.
    pub fn tick(&mut self) -> bool {
        let sampled = self.frame_count % self.interval == 0;
        self.frame_count += 1;
        sampled
    }
}
