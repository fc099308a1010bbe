//! Camera capture and video writer seams for the webcam recorder.
//!
//! The capture device and the encoder are external collaborators; this
//! crate defines the traits the recorder drives them through, plus an
//! OpenCV-backed implementation behind the `opencv` feature.

mod error;
mod frame;
#[cfg(feature = "opencv")]
mod opencv_backend;

pub use error::MediaError;
pub use frame::Frame;
#[cfg(feature = "opencv")]
pub use opencv_backend::OpenCvBackend;

use std::path::Path;

use recorder_ipc::RecorderConfig;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// An opened camera device producing a sequence of frames.
pub trait CameraDevice: Send {
    /// Read one frame, non-blocking beyond device latency.
    ///
    /// Returns `Ok(None)` when no frame is available; that is a missed
    /// frame, not an error.
    fn read_frame(&mut self) -> MediaResult<Option<Frame>>;

    /// The resolution the device was opened with.
    fn resolution(&self) -> recorder_ipc::Resolution;
}

/// An open encoder serializing frames into a video file.
pub trait VideoWriter: Send {
    /// Append one frame to the output file.
    fn write(&mut self, frame: &Frame) -> MediaResult<()>;

    /// Flush and finalize the output file.
    fn close(&mut self) -> MediaResult<()>;

    /// Number of frames written so far.
    fn frames_written(&self) -> u64;
}

/// Factory for camera devices and video writers.
///
/// Shared between the controller (which opens the camera) and the worker
/// (which opens a writer per recording).
pub trait MediaBackend: Send + Sync {
    /// Open the capture device named by `config.device_id`.
    fn open_camera(&self, config: &RecorderConfig) -> MediaResult<Box<dyn CameraDevice>>;

    /// Open an encoder targeting `path` with the configured resolution,
    /// codec, and frame rate.
    fn open_writer(&self, path: &Path, config: &RecorderConfig)
        -> MediaResult<Box<dyn VideoWriter>>;
}
