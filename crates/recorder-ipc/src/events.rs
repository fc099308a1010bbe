//! Events sent from the capture worker back to the controller.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Events that the capture worker can send to the controller.
///
/// These acknowledge command application, so the controller's optimistic
/// state can be confirmed or corrected after the fact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecorderEvent {
    /// An encoder was opened and frames are being written.
    RecordingStarted {
        /// Destination video file.
        path: PathBuf,
    },

    /// The encoder was closed and the output file finalized.
    RecordingStopped {
        /// Destination video file.
        path: PathBuf,

        /// Number of frames written to the file.
        frames_written: u64,
    },

    /// A recording could not be started or was aborted.
    RecordingFailed {
        /// Error description.
        message: String,
    },

    /// The worker loop has exited.
    WorkerStopped,
}
