//! In-memory fakes for the media seams, with an operation ledger.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::Mutex;

use recorder_ipc::{FourCc, RecorderConfig, Resolution};
use recorder_media::{CameraDevice, Frame, MediaBackend, MediaError, MediaResult, VideoWriter};

/// One entry in the backend operation ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BackendOp {
    CameraOpened {
        device_id: u32,
    },
    WriterOpened {
        path: PathBuf,
        codec: FourCc,
        frame_rate: u32,
        resolution: Resolution,
    },
    WriterClosed {
        path: PathBuf,
    },
}

impl BackendOp {
    /// A `WriterOpened` entry with the default recorder settings.
    pub(crate) fn writer_opened_default(path: &str) -> Self {
        Self::WriterOpened {
            path: path.into(),
            codec: FourCc::XVID,
            frame_rate: 30,
            resolution: Resolution::default(),
        }
    }
}

/// Shared record of everything the fake backend was asked to do.
#[derive(Default)]
pub(crate) struct Ledger {
    ops: Mutex<Vec<BackendOp>>,
    frames_written: AtomicU64,
}

impl Ledger {
    pub(crate) fn ops(&self) -> Vec<BackendOp> {
        self.ops.lock().clone()
    }

    pub(crate) fn frames_written(&self) -> u64 {
        self.frames_written.load(Ordering::SeqCst)
    }

    fn record(&self, op: BackendOp) {
        self.ops.lock().push(op);
    }
}

/// Fake media backend whose failure modes can be toggled mid-test.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub(crate) ledger: Arc<Ledger>,
    fail_camera_open: AtomicBool,
    fail_writer_open: AtomicBool,
    fail_writes: AtomicBool,
    starve_camera: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_camera_open(&self, fail: bool) {
        self.fail_camera_open.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writer_open(&self, fail: bool) {
        self.fail_writer_open.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn starve_camera(&self, starve: bool) {
        self.starve_camera.store(starve, Ordering::SeqCst);
    }

    pub(crate) fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl MediaBackend for FakeBackend {
    fn open_camera(&self, config: &RecorderConfig) -> MediaResult<Box<dyn CameraDevice>> {
        if self.fail_camera_open.load(Ordering::SeqCst) {
            return Err(MediaError::DeviceOpen {
                device_id: config.device_id,
            });
        }
        self.ledger.record(BackendOp::CameraOpened {
            device_id: config.device_id,
        });
        Ok(Box::new(FakeCamera {
            resolution: config.resolution,
            starve: Arc::clone(&self.starve_camera),
            fail_reads: Arc::clone(&self.fail_reads),
            sequence: 0,
        }))
    }

    fn open_writer(
        &self,
        path: &Path,
        config: &RecorderConfig,
    ) -> MediaResult<Box<dyn VideoWriter>> {
        if self.fail_writer_open.load(Ordering::SeqCst) {
            return Err(MediaError::EncoderOpen {
                path: path.to_path_buf(),
                codec: config.codec,
                frame_rate: config.frame_rate,
                resolution: config.resolution,
            });
        }
        self.ledger.record(BackendOp::WriterOpened {
            path: path.to_path_buf(),
            codec: config.codec,
            frame_rate: config.frame_rate,
            resolution: config.resolution,
        });
        Ok(Box::new(FakeWriter {
            path: path.to_path_buf(),
            ledger: Arc::clone(&self.ledger),
            fail_writes: self.fail_writes.load(Ordering::SeqCst),
            frames_written: 0,
        }))
    }
}

struct FakeCamera {
    resolution: Resolution,
    starve: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
    sequence: u64,
}

impl CameraDevice for FakeCamera {
    fn read_frame(&mut self) -> MediaResult<Option<Frame>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(MediaError::backend("simulated read failure"));
        }
        if self.starve.load(Ordering::SeqCst) {
            return Ok(None);
        }
        let data = Bytes::from(vec![0u8; Frame::bgr_buffer_size(self.resolution)]);
        let frame = Frame::new(data, self.resolution.width, self.resolution.height, self.sequence);
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }
}

struct FakeWriter {
    path: PathBuf,
    ledger: Arc<Ledger>,
    fail_writes: bool,
    frames_written: u64,
}

impl VideoWriter for FakeWriter {
    fn write(&mut self, _frame: &Frame) -> MediaResult<()> {
        if self.fail_writes {
            return Err(MediaError::backend("simulated write failure"));
        }
        self.frames_written += 1;
        self.ledger.frames_written.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn close(&mut self) -> MediaResult<()> {
        self.ledger.record(BackendOp::WriterClosed {
            path: self.path.clone(),
        });
        Ok(())
    }

    fn frames_written(&self) -> u64 {
        self.frames_written
    }
}

/// Poll `condition` until it holds or `timeout` elapses.
pub(crate) fn wait_for(mut condition: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(1));
    }
    condition()
}

/// Install a test-writer tracing subscriber, once.
pub(crate) fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
