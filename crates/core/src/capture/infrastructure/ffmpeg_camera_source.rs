use thiserror::Error;

use crate::capture::domain::frame_source::FrameSource;
use crate::shared::frame::Frame;

/// Used when the device reports no usable frame rate.
const FALLBACK_FPS: u32 = 30;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("failed to open capture source {url}: {source}")]
    Open {
        url: String,
        #[source]
        source: ffmpeg_next::Error,
    },
    #[error("capture source {0} has no video stream")]
    NoVideoStream(String),
    #[error("capture source reached end of stream")]
    EndOfStream,
    #[error("capture source already released")]
    Released,
    #[error(transparent)]
    Ffmpeg(#[from] ffmpeg_next::Error),
}

/// Captures frames from a camera or stream URL via ffmpeg-next.
///
/// Accepts anything libavformat/libavdevice can open: `/dev/video0` (v4l2),
/// `rtsp://…` streams or plain video files. Decoded frames are converted to
/// RGB24.
pub struct FfmpegCameraSource {
    url: String,
    input: Option<ffmpeg_next::format::context::Input>,
    decoder: Option<ffmpeg_next::decoder::Video>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    stream_index: usize,
    fps: u32,
    width: u32,
    height: u32,
    frame_index: usize,
    flushing: bool,
}

// Safety: FfmpegCameraSource is owned by the sampling loop and only ever
// used from one thread at a time; the raw ffmpeg pointers are never shared.
unsafe impl Send for FfmpegCameraSource {}

impl FfmpegCameraSource {
    pub fn open(url: &str) -> Result<Self, CaptureError> {
        ffmpeg_next::init()?;

        let input = ffmpeg_next::format::input(url).map_err(|source| CaptureError::Open {
            url: url.to_string(),
            source,
        })?;

        let (stream_index, fps, decoder) = {
            let stream = input
                .streams()
                .best(ffmpeg_next::media::Type::Video)
                .ok_or_else(|| CaptureError::NoVideoStream(url.to_string()))?;
            let codec_ctx =
                ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
            let decoder = codec_ctx.decoder().video()?;
            let fps = rational_to_fps(stream.avg_frame_rate())
                .or_else(|| rational_to_fps(stream.rate()))
                .unwrap_or(FALLBACK_FPS);
            (stream.index(), fps, decoder)
        };

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        log::info!("Opened capture source {url}: {width}x{height} @ {fps} fps");

        Ok(Self {
            url: url.to_string(),
            input: Some(input),
            decoder: Some(decoder),
            scaler: Some(scaler),
            stream_index,
            fps,
            width,
            height,
            frame_index: 0,
            flushing: false,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn read_frame(&mut self) -> Result<Frame, CaptureError> {
        let (Some(input), Some(decoder), Some(scaler)) = (
            self.input.as_mut(),
            self.decoder.as_mut(),
            self.scaler.as_mut(),
        ) else {
            return Err(CaptureError::Released);
        };

        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        loop {
            if decoder.receive_frame(&mut decoded).is_ok() {
                let mut rgb = ffmpeg_next::util::frame::video::Video::empty();
                scaler.run(&decoded, &mut rgb)?;
                let pixels = extract_rgb_pixels(&rgb, self.width, self.height);
                let frame = Frame::new(pixels, self.width, self.height, self.frame_index);
                self.frame_index += 1;
                return Ok(frame);
            }

            if self.flushing {
                return Err(CaptureError::EndOfStream);
            }

            match input.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() != self.stream_index {
                        continue;
                    }
                    if let Err(e) = decoder.send_packet(&packet) {
                        log::debug!("Dropping undecodable packet: {e}");
                    }
                }
                None => {
                    decoder.send_eof()?;
                    self.flushing = true;
                }
            }
        }
    }
}

impl FrameSource for FfmpegCameraSource {
    fn next_frame(&mut self) -> Result<Frame, Box<dyn std::error::Error>> {
        Ok(self.read_frame()?)
    }

    fn nominal_fps(&self) -> u32 {
        self.fps
    }

    fn release(&mut self) {
        if self.input.take().is_some() {
            log::info!("Released capture source {}", self.url);
        }
        self.decoder = None;
        self.scaler = None;
    }
}

fn rational_to_fps(rate: ffmpeg_next::Rational) -> Option<u32> {
    if rate.denominator() == 0 || rate.numerator() <= 0 {
        return None;
    }
    let fps = (rate.numerator() as f64 / rate.denominator() as f64).round() as u32;
    (fps > 0).then_some(fps)
}

/// Copies packed RGB rows out of a (possibly padded) ffmpeg frame.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_bytes = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + row_bytes]);
    }
    pixels
}
