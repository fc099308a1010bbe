//! Captured frame type.

use std::time::Instant;

use bytes::Bytes;

use recorder_ipc::Resolution;

/// One captured video frame in packed BGR8 layout.
#[derive(Debug, Clone)]
pub struct Frame {
    /// BGR8 pixel data, `width * height * 3` bytes.
    pub data: Bytes,

    /// Frame width in pixels.
    pub width: u32,

    /// Frame height in pixels.
    pub height: u32,

    /// Monotonic timestamp taken when the frame was read.
    pub captured_at: Instant,

    /// Monotonically increasing sequence number within one camera session.
    pub sequence: u64,
}

impl Frame {
    /// Create a new frame, stamping it with the current time.
    pub fn new(data: Bytes, width: u32, height: u32, sequence: u64) -> Self {
        Self {
            data,
            width,
            height,
            captured_at: Instant::now(),
            sequence,
        }
    }

    /// Expected BGR8 buffer size for the given resolution.
    pub fn bgr_buffer_size(resolution: Resolution) -> usize {
        resolution.width as usize * resolution.height as usize * 3
    }

    /// The frame's dimensions as a resolution.
    pub fn resolution(&self) -> Resolution {
        Resolution::new(self.width, self.height)
    }

    /// Validate that the frame data matches its stated dimensions.
    pub fn is_valid(&self) -> bool {
        self.data.len() == Self::bgr_buffer_size(self.resolution())
    }
}
