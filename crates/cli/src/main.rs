use std::process;
use std::sync::Arc;

use clap::Parser;

use facewatch_core::annotation::infrastructure::box_outline_annotator::BoxOutlineAnnotator;
use facewatch_core::capture::infrastructure::ffmpeg_camera_source::FfmpegCameraSource;
use facewatch_core::detection::infrastructure::onnx_face_detector::OnnxFaceDetector;
use facewatch_core::monitoring::monitor_logger::SummaryMonitorLogger;
use facewatch_core::monitoring::monitor_state::MonitorState;
use facewatch_core::monitoring::sample_loop::SampleLoop;
use facewatch_core::monitoring::stop_watcher::StopWatcher;
use facewatch_core::monitoring::trigger_listener::TriggerListener;
use facewatch_core::reporting::infrastructure::http_reporter::HttpReporter;
use facewatch_core::shared::constants::{
    DEFAULT_CAMERA_DEVICE, DEFAULT_CONFIDENCE, HTTP_TIMEOUT, PUSH_READ_TIMEOUT, YOLO_MODEL_NAME,
    YOLO_MODEL_URL,
};
use facewatch_core::shared::endpoints::CollectorEndpoints;
use facewatch_core::shared::model_resolver;
use facewatch_core::signals::infrastructure::line_stop_signal::LineStopSignal;
use facewatch_core::signals::infrastructure::websocket_push_channel::WebSocketPushChannel;
use facewatch_core::snapshot::infrastructure::jpeg_snapshot_store::JpegSnapshotStore;

/// Watches the camera and reports face-count changes to a collector.
///
/// Press Enter (or Ctrl-C) to stop.
#[derive(Parser, Debug)]
#[command(name = "facewatch")]
struct Cli {
    /// Collector host name or IP address.
    server: String,

    /// Collector port, shared by the push channel and the ingestion endpoint.
    port: u16,
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let endpoints = CollectorEndpoints::new(&cli.server, cli.port)?;
    log::info!(
        "Collector ingest {} / push {}",
        endpoints.ingest_url(),
        endpoints.push_url()
    );

    let detector = build_detector()?;
    let source = FfmpegCameraSource::open(DEFAULT_CAMERA_DEVICE)?;
    let reporter = HttpReporter::new(endpoints.ingest_url().clone(), HTTP_TIMEOUT)?;

    let state = Arc::new(MonitorState::new());
    {
        let state = Arc::clone(&state);
        ctrlc::set_handler(move || {
            log::info!("Interrupt received, stopping");
            state.request_stop();
        })?;
    }

    let channel = WebSocketPushChannel::new(endpoints.push_url().clone(), PUSH_READ_TIMEOUT);
    let listener = TriggerListener::new(Box::new(channel), Arc::clone(&state)).spawn()?;
    // Not joined: it stays blocked on stdin when stop comes from elsewhere.
    StopWatcher::new(Box::new(LineStopSignal::stdin()), Arc::clone(&state)).spawn()?;

    eprintln!("Monitoring {DEFAULT_CAMERA_DEVICE}. Press Enter to stop.");
    let mut sample_loop = SampleLoop::new(
        Box::new(source),
        Box::new(detector),
        Box::new(BoxOutlineAnnotator::default()),
        Box::new(JpegSnapshotStore::in_working_dir()),
        Box::new(reporter),
        Arc::clone(&state),
    )
    .with_logger(Box::new(SummaryMonitorLogger::new()));

    let result = sample_loop.run();

    state.request_stop();
    if listener.join().is_err() {
        log::warn!("Trigger listener panicked");
    }
    result?;
    Ok(())
}

fn build_detector() -> Result<OnnxFaceDetector, Box<dyn std::error::Error>> {
    log::info!("Resolving model: {YOLO_MODEL_NAME}");
    let model_path = model_resolver::resolve(
        YOLO_MODEL_NAME,
        YOLO_MODEL_URL,
        Some(Box::new(download_progress)),
    )?;
    eprintln!();

    OnnxFaceDetector::new(&model_path, DEFAULT_CONFIDENCE)
}

fn download_progress(downloaded: u64, total: u64) {
    if total > 0 {
        let pct = (downloaded as f64 / total as f64 * 100.0) as u32;
        eprint!("\rDownloading face detection model... {pct}%");
    } else {
        eprint!("\rDownloading face detection model... {downloaded} bytes");
    }
}
