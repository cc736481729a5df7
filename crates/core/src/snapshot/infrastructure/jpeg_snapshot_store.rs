use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;
use crate::snapshot::domain::snapshot_store::SnapshotStore;

/// Writes snapshots as JPEG files into a fixed directory using the `image` crate.
pub struct JpegSnapshotStore {
    dir: PathBuf,
}

impl JpegSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the process working directory.
    pub fn in_working_dir() -> Self {
        Self::new(".")
    }
}

impl SnapshotStore for JpegSnapshotStore {
    fn save(&self, file_name: &str, frame: &Frame) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = self.dir.join(file_name);
        let img = image::RgbImage::from_raw(frame.width(), frame.height(), frame.data().to_vec())
            .ok_or("Failed to create image from frame data")?;
        img.save_with_format(&path, image::ImageFormat::Jpeg)?;
        Ok(path)
    }

    fn remove(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::remove_file(path)?;
        Ok(())
    }
}
