//! OpenCV-backed camera and encoder implementations.

use std::path::Path;

use bytes::Bytes;
use opencv::core::{Mat, Size};
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture, VideoWriter as CvVideoWriter};
use tracing::{debug, info, warn};

use recorder_ipc::{RecorderConfig, Resolution};

use crate::error::MediaError;
use crate::frame::Frame;
use crate::{CameraDevice, MediaBackend, MediaResult, VideoWriter};

fn cv_err(err: opencv::Error) -> MediaError {
    MediaError::backend(err.to_string())
}

/// Media backend built on OpenCV's `VideoCapture` and `VideoWriter`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenCvBackend;

impl OpenCvBackend {
    /// Create a new OpenCV backend.
    pub fn new() -> Self {
        Self
    }
}

impl MediaBackend for OpenCvBackend {
    fn open_camera(&self, config: &RecorderConfig) -> MediaResult<Box<dyn CameraDevice>> {
        let mut capture =
            VideoCapture::new(config.device_id as i32, videoio::CAP_ANY).map_err(cv_err)?;

        if !capture.is_opened().map_err(cv_err)? {
            return Err(MediaError::DeviceOpen {
                device_id: config.device_id,
            });
        }

        // Best effort: some drivers silently ignore resolution hints.
        let width = config.resolution.width as f64;
        let height = config.resolution.height as f64;
        let width_ok = capture
            .set(videoio::CAP_PROP_FRAME_WIDTH, width)
            .map_err(cv_err)?;
        let height_ok = capture
            .set(videoio::CAP_PROP_FRAME_HEIGHT, height)
            .map_err(cv_err)?;
        if !width_ok || !height_ok {
            warn!(
                resolution = %config.resolution,
                "capture device did not accept resolution hint"
            );
        }

        info!(device_id = config.device_id, resolution = %config.resolution, "camera opened");

        Ok(Box::new(OpenCvCamera {
            capture,
            resolution: config.resolution,
            sequence: 0,
        }))
    }

    fn open_writer(
        &self,
        path: &Path,
        config: &RecorderConfig,
    ) -> MediaResult<Box<dyn VideoWriter>> {
        let encoder_open = || MediaError::EncoderOpen {
            path: path.to_path_buf(),
            codec: config.codec,
            frame_rate: config.frame_rate,
            resolution: config.resolution,
        };

        let [c0, c1, c2, c3] = config.codec.chars();
        let fourcc = CvVideoWriter::fourcc(c0, c1, c2, c3).map_err(|_| encoder_open())?;

        let size = Size::new(
            config.resolution.width as i32,
            config.resolution.height as i32,
        );
        let writer = CvVideoWriter::new(
            &path.to_string_lossy(),
            fourcc,
            config.frame_rate as f64,
            size,
            true,
        )
        .map_err(|_| encoder_open())?;

        if !writer.is_opened().map_err(cv_err)? {
            return Err(encoder_open());
        }

        debug!(path = %path.display(), codec = %config.codec, "video writer opened");

        Ok(Box::new(OpenCvWriter {
            writer,
            frames_written: 0,
        }))
    }
}

struct OpenCvCamera {
    capture: VideoCapture,
    resolution: Resolution,
    sequence: u64,
}

impl CameraDevice for OpenCvCamera {
    fn read_frame(&mut self) -> MediaResult<Option<Frame>> {
        let mut mat = Mat::default();
        let grabbed = self.capture.read(&mut mat).map_err(cv_err)?;
        if !grabbed || mat.empty() {
            return Ok(None);
        }

        let data = Bytes::copy_from_slice(mat.data_bytes().map_err(cv_err)?);
        let frame = Frame::new(data, mat.cols() as u32, mat.rows() as u32, self.sequence);
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }
}

struct OpenCvWriter {
    writer: CvVideoWriter,
    frames_written: u64,
}

impl VideoWriter for OpenCvWriter {
    fn write(&mut self, frame: &Frame) -> MediaResult<()> {
        let flat = Mat::from_slice(frame.data.as_ref()).map_err(cv_err)?;
        let mat = flat
            .reshape(3, frame.height as i32)
            .map_err(cv_err)?
            .try_clone()
            .map_err(cv_err)?;
        self.writer.write(&mat).map_err(cv_err)?;
        self.frames_written += 1;
        Ok(())
    }

    fn close(&mut self) -> MediaResult<()> {
        self.writer.release().map_err(cv_err)
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }
}
