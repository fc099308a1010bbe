//! Error types for the recorder lifecycle.

use thiserror::Error;

use recorder_media::MediaError;

/// Errors surfaced by [`VideoRecorder`](crate::VideoRecorder) operations.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// `start()` was called on an already started recorder.
    #[error("recorder is already started")]
    AlreadyStarted,

    /// A lifecycle method was called before `start()`.
    #[error("recorder must be started first by calling start()")]
    NotStarted,

    /// `start_recording()` was called while a recording is in progress.
    #[error("cannot record a video while one is already recording")]
    AlreadyRecording,

    /// `stop_recording()` was called with no recording in progress.
    #[error("cannot stop a video recording when it's not recording")]
    NotRecording,

    /// `start()` was called after `stop()` released the camera.
    #[error("camera was released by stop(); the recorder cannot be restarted")]
    CameraReleased,

    /// The worker exited and its command channel is gone.
    #[error("capture worker channel disconnected")]
    Disconnected,

    /// The worker reported a failed recording session.
    #[error("recording failed: {message}")]
    RecordingFailed {
        /// Error description reported by the worker.
        message: String,
    },

    /// Camera or encoder failure surfaced synchronously.
    #[error(transparent)]
    Media(#[from] MediaError),
}

impl RecorderError {
    /// Returns true if this error is a lifecycle precondition violation.
    pub fn is_invalid_state(&self) -> bool {
        matches!(
            self,
            Self::AlreadyStarted
                | Self::NotStarted
                | Self::AlreadyRecording
                | Self::NotRecording
                | Self::CameraReleased
        )
    }
}
