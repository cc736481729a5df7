use chrono::{DateTime, Local};

use crate::shared::constants::{SNAPSHOT_EXTENSION, TIMESTAMP_FORMAT};

/// Source of wall-clock time for detection timestamps.
pub type Clock = Box<dyn Fn() -> DateTime<Local> + Send>;

pub fn system_clock() -> Clock {
    Box::new(Local::now)
}

/// Formats a timestamp as `DD-MM-YYYY_HH:MM:SS`, the layout the collector parses.
pub fn format_timestamp(at: &DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Snapshot file name for a detection taken at `at`, e.g. `19-10-2026_14:03:27.jpg`.
pub fn snapshot_file_name(at: &DateTime<Local>) -> String {
    format!("{}.{SNAPSHOT_EXTENSION}", format_timestamp(at))
}
