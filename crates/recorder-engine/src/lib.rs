//! Recorder controller and capture worker.
//!
//! This crate coordinates the camera and encoder collaborators: a
//! [`VideoRecorder`] opens the camera and spawns a capture worker thread,
//! then drives it over a FIFO command channel to start and stop recordings.

mod controller;
mod error;
mod worker;

#[cfg(test)]
pub(crate) mod test_support;

pub use controller::VideoRecorder;
pub use error::RecorderError;

pub use recorder_ipc::{FourCc, RecorderConfig, RecorderEvent, Resolution, WorkerStatus};
pub use recorder_media::{CameraDevice, Frame, MediaBackend, MediaError, VideoWriter};

#[cfg(feature = "opencv")]
pub use recorder_media::OpenCvBackend;

/// Result type for recorder operations.
pub type RecorderResult<T> = Result<T, RecorderError>;
