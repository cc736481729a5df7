use std::time::Duration;

pub const YOLO_MODEL_NAME: &str = "yolo11n-pose_widerface.onnx";
pub const YOLO_MODEL_URL: &str =
    "https://github.com/neutrinographics/faceguard/releases/download/v0.1.0/yolo11n-pose_widerface.onnx";

/// Default confidence threshold for counting a detection as a face.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Capture device opened by the CLI. Any ffmpeg input URL works here.
pub const DEFAULT_CAMERA_DEVICE: &str = "/dev/video0";

/// Path of the collector's push channel.
pub const PUSH_CHANNEL_PATH: &str = "/msg";

/// Path of the collector's image ingestion endpoint.
pub const INGEST_PATH: &str = "/api/v1/image";

/// `strftime` layout shared by `created_at` and snapshot file names.
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y_%H:%M:%S";

pub const SNAPSHOT_EXTENSION: &str = "jpg";

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub const RECONNECT_INITIAL_BACKOFF: Duration = Duration::from_secs(1);
pub const RECONNECT_MAX_BACKOFF: Duration = Duration::from_secs(30);

/// How long a push-channel read may block before the listener rechecks stop.
pub const PUSH_READ_TIMEOUT: Duration = Duration::from_secs(1);

/// Upper bound on the TCP connect plus WebSocket upgrade of the push channel.
pub const PUSH_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Outline color for annotated faces (yellow).
pub const ANNOTATION_COLOR: [u8; 3] = [255, 255, 0];
