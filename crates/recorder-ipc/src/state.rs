//! Worker status cell contents.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// The capture worker's view of its own state.
///
/// Written only by the worker, shared read-only with the controller. This
/// cell, not the controller's optimistic flags, is the source of truth for
/// whether frames are actually being written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkerStatus {
    /// Worker is polling for commands, no encoder open.
    #[default]
    Idle,

    /// An encoder is open and frames are being written.
    Recording {
        /// Destination video file.
        path: PathBuf,
    },

    /// The last recording attempt failed; the worker is still running.
    Failed {
        /// Error description.
        message: String,
    },

    /// The worker loop has exited.
    Stopped,
}

impl WorkerStatus {
    /// Returns true if the worker is idle.
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Returns true if an encoder is currently open.
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }

    /// Returns true if the last recording attempt failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Returns true if the worker has exited.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns a simple string representation of the status.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Recording { .. } => "Recording",
            Self::Failed { .. } => "Failed",
            Self::Stopped => "Stopped",
        }
    }
}
