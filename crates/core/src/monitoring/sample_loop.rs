use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::annotation::domain::frame_annotator::FrameAnnotator;
use crate::capture::domain::frame_source::FrameSource;
use crate::detection::domain::face_detector::FaceDetector;
use crate::reporting::domain::report_event::ReportEvent;
use crate::reporting::domain::reporter::Reporter;
use crate::shared::frame::Frame;
use crate::shared::timestamp::{snapshot_file_name, system_clock, Clock};
use crate::snapshot::domain::snapshot_store::SnapshotStore;

use super::monitor_logger::{
    MonitorLogger, NullMonitorLogger, COUNTER_DROPPED, COUNTER_REPORTED, COUNTER_SAMPLED,
    STAGE_CAPTURE, STAGE_DETECT, STAGE_REPORT,
};
use super::monitor_state::MonitorState;
use super::sampling_cadence::SamplingCadence;

#[derive(Error, Debug)]
pub enum SampleLoopError {
    #[error("frame acquisition failed: {0}")]
    Acquisition(#[source] Box<dyn std::error::Error>),
}

/// What one detection cycle ended in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Count unchanged and no manual request pending.
    Unchanged { count: usize },
    /// The report was delivered to the collector.
    Reported { count: usize },
    /// A report was due but the snapshot could not be written or sent.
    Dropped { count: usize },
    /// The detector failed; no decision was made.
    DetectionFailed,
}

/// Samples the camera, detects faces and reports changes in the face count
/// until stop is requested.
///
/// Owns the frame source exclusively and releases it exactly once when
/// `run` returns, whether it stopped normally or on an acquisition error.
pub struct SampleLoop {
    source: Box<dyn FrameSource>,
    detector: Box<dyn FaceDetector>,
    annotator: Box<dyn FrameAnnotator>,
    snapshots: Box<dyn SnapshotStore>,
    reporter: Box<dyn Reporter>,
    state: Arc<MonitorState>,
    logger: Box<dyn MonitorLogger>,
    clock: Clock,
}

impl SampleLoop {
    pub fn new(
        source: Box<dyn FrameSource>,
        detector: Box<dyn FaceDetector>,
        annotator: Box<dyn FrameAnnotator>,
        snapshots: Box<dyn SnapshotStore>,
        reporter: Box<dyn Reporter>,
        state: Arc<MonitorState>,
    ) -> Self {
        Self {
            source,
            detector,
            annotator,
            snapshots,
            reporter,
            state,
            logger: Box::new(NullMonitorLogger),
            clock: system_clock(),
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn MonitorLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn run(&mut self) -> Result<(), SampleLoopError> {
        let mut cadence = SamplingCadence::new(self.source.nominal_fps());
        log::info!(
            "Sampling one frame in {} (source reports {} fps)",
            cadence.interval(),
            self.source.nominal_fps()
        );

        let result = self.sample_until_stopped(&mut cadence);
        self.source.release();
        self.logger.summary();

        match &result {
            Ok(()) => log::info!("Sampling stopped"),
            Err(e) => log::error!("Sampling aborted: {e}"),
        }
        result
    }

    fn sample_until_stopped(&mut self, cadence: &mut SamplingCadence) -> Result<(), SampleLoopError> {
        loop {
            if self.state.is_stop_requested() {
                return Ok(());
            }

            let capture_start = Instant::now();
            let frame = self
                .source
                .next_frame()
                .map_err(SampleLoopError::Acquisition)?;

            // A frame acquired after stop was requested is discarded.
            if self.state.is_stop_requested() {
                return Ok(());
            }
            if !cadence.tick() {
                continue;
            }

            self.logger.timing(STAGE_CAPTURE, elapsed_ms(capture_start));
            self.logger.count(COUNTER_SAMPLED);
            self.cycle(frame);
        }
    }

    /// Runs detection on one sampled frame and reports it if due.
    pub fn cycle(&mut self, mut frame: Frame) -> CycleOutcome {
        let detected_at = (self.clock)();
        let detect_start = Instant::now();
        let faces = match self.detector.detect(&frame) {
            Ok(faces) => faces,
            Err(e) => {
                log::warn!("Detection failed on frame {}: {e}", frame.index());
                return CycleOutcome::DetectionFailed;
            }
        };
        self.logger.timing(STAGE_DETECT, elapsed_ms(detect_start));

        let count = faces.len();
        let decision = self.state.decide(count);
        if !decision.should_report {
            log::debug!("Frame {}: {count} face(s), unchanged", frame.index());
            return CycleOutcome::Unchanged { count };
        }
        log::debug!(
            "Frame {}: reporting {count} face(s) (changed: {}, manual: {})",
            frame.index(),
            decision.count_changed,
            decision.manual
        );

        self.annotator.annotate(&mut frame, &faces);
        if self.report(&frame, detected_at, count) {
            self.logger.count(COUNTER_REPORTED);
            CycleOutcome::Reported { count }
        } else {
            self.logger.count(COUNTER_DROPPED);
            CycleOutcome::Dropped { count }
        }
    }

    /// Saves the snapshot, sends it and removes it again. Returns whether
    /// the collector accepted the report.
    fn report(&mut self, frame: &Frame, detected_at: DateTime<Local>, count: usize) -> bool {
        let file_name = snapshot_file_name(&detected_at);
        let image_path = match self.snapshots.save(&file_name, frame) {
            Ok(path) => path,
            Err(e) => {
                log::warn!("Dropping report: failed to save snapshot {file_name}: {e}");
                return false;
            }
        };

        let event = ReportEvent {
            created_at: detected_at,
            face_count: count,
            image_path,
        };
        let report_start = Instant::now();
        let sent = self.reporter.report(&event);
        self.logger.timing(STAGE_REPORT, elapsed_ms(report_start));

        if let Err(e) = self.snapshots.remove(&event.image_path) {
            log::warn!(
                "Failed to remove snapshot {}: {e}",
                event.image_path.display()
            );
        }

        match sent {
            Ok(()) => {
                log::info!(
                    "Reported {count} face(s) at {}",
                    event.created_at_label()
                );
                true
            }
            Err(e) => {
                log::warn!("Dropping report of {count} face(s): {e}");
                false
            }
        }
    }
}

fn elapsed_ms(since: Instant) -> f64 {
    since.elapsed().as_secs_f64() * 1000.0
}
