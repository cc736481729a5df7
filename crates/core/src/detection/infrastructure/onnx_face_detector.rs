//! YOLO face detector running on ONNX Runtime via `ort`.
//!
//! Letterboxes the frame to the model's square input, runs inference,
//! filters by confidence and suppresses overlapping boxes. Output boxes are in
//! original frame coordinates, clamped to the frame.
use std::path::Path;

use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::face_box::FaceBox;
use crate::shared::frame::Frame;

/// Fallback input resolution when the model's input shape is dynamic.
const DEFAULT_INPUT_SIZE: u32 = 640;

/// NMS IoU threshold.
const NMS_IOU_THRESH: f64 = 0.45;

/// Letterbox padding value (YOLO convention).
const PAD_VALUE: f32 = 114.0 / 255.0;

pub struct OnnxFaceDetector {
    session: ort::session::Session,
    confidence: f64,
    input_size: u32,
}

impl OnnxFaceDetector {
    /// Loads a YOLO face model.
    ///
    /// The input resolution is read from the model's NCHW input shape,
    /// falling back to 640.
    pub fn new(model_path: &Path, confidence: f64) -> Result<Self, Box<dyn std::error::Error>> {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!("confidence must be within 0.0..=1.0, got {confidence}").into());
        }

        let session = ort::session::Session::builder()?
            .with_execution_providers(platform_execution_providers())?
            .commit_from_file(model_path)?;

        let input_size = session
            .inputs()
            .first()
            .and_then(|input| match input.dtype() {
                ort::value::ValueType::Tensor { ref shape, .. }
                    if shape.len() >= 4 && shape[2] > 0 =>
                {
                    Some(shape[2] as u32)
                }
                _ => None,
            })
            .unwrap_or(DEFAULT_INPUT_SIZE);

        log::info!(
            "Loaded face model {} (input {input_size}px, confidence {confidence})",
            model_path.display()
        );

        Ok(Self {
            session,
            confidence,
            input_size,
        })
    }
}

impl FaceDetector for OnnxFaceDetector {
    fn detect(&mut self, frame: &Frame) -> Result<Vec<FaceBox>, Box<dyn std::error::Error>> {
        let letterboxed = letterbox(frame, self.input_size);

        let input_value = ort::value::Tensor::from_array(letterboxed.tensor.clone())?;
        let outputs = self.session.run(ort::inputs![input_value])?;
        if outputs.len() == 0 {
            return Err("face model produced no outputs".into());
        }
        let tensor = outputs[0].try_extract_array::<f32>()?;
        let shape = tensor.shape().to_vec();
        if shape.len() != 3 {
            return Err(format!("unexpected face model output shape: {shape:?}").into());
        }
        let data = tensor.as_slice().ok_or("face model output is not contiguous")?;

        // Output is [1, features, detections] (transposed) or [1, detections, features].
        let transposed = shape[1] < shape[2];
        let (num_dets, num_feats) = if transposed {
            (shape[2], shape[1])
        } else {
            (shape[1], shape[2])
        };
        if num_feats < 5 {
            return Err(format!("face model output has {num_feats} features, need 5").into());
        }

        let feature = |det: usize, f: usize| -> f64 {
            let idx = if transposed {
                f * num_dets + det
            } else {
                det * num_feats + f
            };
            data[idx] as f64
        };

        let mut candidates = Vec::new();
        for det in 0..num_dets {
            let conf = feature(det, 4);
            if conf < self.confidence {
                continue;
            }
            // [cx, cy, w, h] in letterbox space
            let (cx, cy, w, h) = (
                feature(det, 0),
                feature(det, 1),
                feature(det, 2),
                feature(det, 3),
            );
            let (x1, y1) = letterboxed.to_frame(cx - w / 2.0, cy - h / 2.0);
            let (x2, y2) = letterboxed.to_frame(cx + w / 2.0, cy + h / 2.0);
            candidates.push(Candidate {
                face: FaceBox::from_corners(x1, y1, x2, y2),
                confidence: conf,
            });
        }

        let faces = nms(candidates, NMS_IOU_THRESH)
            .into_iter()
            .map(|c| c.face.clamp_to(frame.width(), frame.height()))
            .filter(|face| !face.is_empty())
            .collect();
        Ok(faces)
    }
}

/// Hardware acceleration where ONNX Runtime offers it; CPU otherwise.
fn platform_execution_providers() -> Vec<ort::execution_providers::ExecutionProviderDispatch> {
    #[allow(unused_mut)]
    let mut providers = Vec::new();
    #[cfg(target_os = "macos")]
    providers.push(ort::execution_providers::CoreMLExecutionProvider::default().build());
    #[cfg(target_os = "windows")]
    providers.push(ort::execution_providers::DirectMLExecutionProvider::default().build());
    providers
}

// ---------------------------------------------------------------------------
// Preprocessing
// ---------------------------------------------------------------------------

struct Letterboxed {
    tensor: ndarray::Array4<f32>,
    scale: f64,
    pad_x: u32,
    pad_y: u32,
}

impl Letterboxed {
    fn to_frame(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.pad_x as f64) / self.scale,
            (y - self.pad_y as f64) / self.scale,
        )
    }
}

/// Nearest-neighbor resize into a padded `target_size` square NCHW tensor.
fn letterbox(frame: &Frame, target_size: u32) -> Letterboxed {
    let fw = frame.width() as f64;
    let fh = frame.height() as f64;
    let target = target_size as f64;

    let scale = (target / fw).min(target / fh);
    let new_w = ((fw * scale).round() as u32).min(target_size);
    let new_h = ((fh * scale).round() as u32).min(target_size);
    let pad_x = (target_size - new_w) / 2;
    let pad_y = (target_size - new_h) / 2;

    let mut tensor = ndarray::Array4::<f32>::from_elem(
        (1, 3, target_size as usize, target_size as usize),
        PAD_VALUE,
    );

    let src = frame.as_ndarray();
    let src_h = frame.height() as usize;
    let src_w = frame.width() as usize;
    for y in 0..new_h as usize {
        let src_y = ((y as f64 / scale) as usize).min(src_h - 1);
        for x in 0..new_w as usize {
            let src_x = ((x as f64 / scale) as usize).min(src_w - 1);
            for c in 0..3 {
                tensor[[0, c, pad_y as usize + y, pad_x as usize + x]] =
                    src[[src_y, src_x, c]] as f32 / 255.0;
            }
        }
    }

    Letterboxed {
        tensor,
        scale,
        pad_x,
        pad_y,
    }
}

// ---------------------------------------------------------------------------
// NMS
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
struct Candidate {
    face: FaceBox,
    confidence: f64,
}

/// Greedy NMS: highest confidence first, drop anything overlapping a kept box.
fn nms(mut candidates: Vec<Candidate>, iou_thresh: f64) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    let mut keep: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if keep
            .iter()
            .all(|kept| kept.face.iou(&candidate.face) <= iou_thresh)
        {
            keep.push(candidate);
        }
    }
    keep
}
