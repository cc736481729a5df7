use std::path::PathBuf;

use chrono::{DateTime, Local};

use crate::shared::timestamp::format_timestamp;

/// One outbound report: when the detection ran, how many faces it found and
/// the annotated snapshot showing them.
///
/// `face_count` always equals the number of boxes drawn on the snapshot;
/// both come from the same detection pass.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportEvent {
    pub created_at: DateTime<Local>,
    pub face_count: usize,
    pub image_path: PathBuf,
}

impl ReportEvent {
    /// `created_at` in the collector's `DD-MM-YYYY_HH:MM:SS` layout.
    pub fn created_at_label(&self) -> String {
        format_timestamp(&self.created_at)
    }
}
