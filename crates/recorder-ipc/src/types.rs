//! Common configuration types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pixel dimensions for capture and encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,

    /// Height in pixels.
    pub height: u32,
}

impl Resolution {
    /// Create a new resolution.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Error parsing a four-character codec identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fourcc {value:?}: must be exactly 4 printable ASCII characters")]
pub struct FourCcError {
    /// The rejected input.
    pub value: String,
}

/// A four-character codec identifier, e.g. `XVID` or `MJPG`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FourCc([u8; 4]);

impl FourCc {
    /// The default XVID (MPEG-4) codec.
    pub const XVID: FourCc = FourCc(*b"XVID");

    /// The four characters of the identifier.
    pub fn chars(&self) -> [char; 4] {
        [
            self.0[0] as char,
            self.0[1] as char,
            self.0[2] as char,
            self.0[3] as char,
        ]
    }

    /// The identifier as raw bytes.
    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }
}

impl Default for FourCc {
    fn default() -> Self {
        Self::XVID
    }
}

impl FromStr for FourCc {
    type Err = FourCcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 || !bytes.iter().all(|b| b.is_ascii_graphic()) {
            return Err(FourCcError {
                value: s.to_string(),
            });
        }
        Ok(Self([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

impl TryFrom<String> for FourCc {
    type Error = FourCcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FourCc> for String {
    fn from(fourcc: FourCc) -> Self {
        fourcc.to_string()
    }
}

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.chars() {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

/// Configuration for a recorder, fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecorderConfig {
    /// Index of the capture device to open.
    pub device_id: u32,

    /// Capture and encoding resolution (default: 640x480).
    pub resolution: Resolution,

    /// Four-character codec identifier (default: XVID).
    pub codec: FourCc,

    /// Target frames per second for output encoding (default: 30).
    pub frame_rate: u32,
}

impl RecorderConfig {
    /// Configuration for the given device with default encoding settings.
    pub fn for_device(device_id: u32) -> Self {
        Self {
            device_id,
            ..Self::default()
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            resolution: Resolution::default(),
            codec: FourCc::default(),
            frame_rate: 30,
        }
    }
}
