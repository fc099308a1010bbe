//! Error types for media operations.

use std::path::PathBuf;

use thiserror::Error;

use recorder_ipc::{FourCc, Resolution};

/// Errors that can occur opening or driving the media collaborators.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The capture device could not be opened.
    #[error("unable to open video device {device_id}")]
    DeviceOpen {
        /// Index of the device that failed to open.
        device_id: u32,
    },

    /// An encoder could not be opened for an output file.
    #[error(
        "unable to open video writer for file {}, codec {codec}, \
         at fps {frame_rate}, res {resolution}",
        .path.display()
    )]
    EncoderOpen {
        /// Destination file that could not be opened.
        path: PathBuf,

        /// Requested codec.
        codec: FourCc,

        /// Requested frame rate.
        frame_rate: u32,

        /// Requested resolution.
        resolution: Resolution,
    },

    /// Backend library error.
    #[error("media backend error: {message}")]
    Backend {
        /// Error description from the backend.
        message: String,
    },
}

impl MediaError {
    /// Wrap a backend library error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoder_open_error_carries_all_requested_settings() {
        let err = MediaError::EncoderOpen {
            path: PathBuf::from("clip1.avi"),
            codec: FourCc::XVID,
            frame_rate: 15,
            resolution: Resolution::new(320, 240),
        };
        let message = err.to_string();
        assert!(message.contains("clip1.avi"));
        assert!(message.contains("XVID"));
        assert!(message.contains("15"));
        assert!(message.contains("320x240"));
    }
}
