use std::path::{Path, PathBuf};

use crate::shared::frame::Frame;

/// Transient on-disk storage for the annotated frame attached to a report.
///
/// Each saved snapshot lives for a single report attempt: the sampling loop
/// saves it, hands the path to the reporter and removes it afterwards.
pub trait SnapshotStore: Send {
    /// Encodes `frame` under `file_name` and returns the full path written.
    fn save(&self, file_name: &str, frame: &Frame) -> Result<PathBuf, Box<dyn std::error::Error>>;

    fn remove(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>>;
}
