//! Commands sent from the controller to the capture worker.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Commands that the controller can send to the capture worker.
///
/// The command channel is FIFO; the worker applies at most one command per
/// loop iteration, in the order they were enqueued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecorderCommand {
    /// Open an encoder for the given file and begin writing frames to it.
    StartRecording {
        /// Destination video file.
        output_path: PathBuf,
    },

    /// Close the current encoder, finalizing the output file.
    StopRecording,

    /// Close any open encoder and exit the worker loop.
    Shutdown,
}
