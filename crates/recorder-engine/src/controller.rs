//! The recorder controller.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::RwLock;
use tracing::{debug, info, instrument};

use recorder_ipc::{
    command_channel, event_channel, RecorderCommand, RecorderConfig, RecorderEvent, WorkerStatus,
};
use recorder_media::{CameraDevice, MediaBackend};

use crate::error::RecorderError;
use crate::worker::CaptureWorker;
use crate::RecorderResult;

/// Resources handed to the capture worker when it is spawned.
struct WorkerHandoff {
    camera: Box<dyn CameraDevice>,
    command_rx: Receiver<RecorderCommand>,
    event_tx: Sender<RecorderEvent>,
}

/// A process-isolated webcam video recorder.
///
/// Owns the camera lifecycle and the command channel; [`start`] spawns the
/// capture worker thread, [`start_recording`]/[`stop_recording`] enqueue
/// commands for it, and [`stop`] shuts it down cooperatively, joining the
/// thread so any open output file is finalized before the camera is
/// released.
///
/// Lifecycle preconditions are enforced synchronously on the controller's
/// own (optimistic) flags; the worker's status cell and event channel
/// confirm or correct them after the fact.
///
/// [`start`]: VideoRecorder::start
/// [`start_recording`]: VideoRecorder::start_recording
/// [`stop_recording`]: VideoRecorder::stop_recording
/// [`stop`]: VideoRecorder::stop
pub struct VideoRecorder {
    backend: Arc<dyn MediaBackend>,
    config: RecorderConfig,
    handoff: Option<WorkerHandoff>,
    command_tx: Sender<RecorderCommand>,
    event_rx: Receiver<RecorderEvent>,
    status: Arc<RwLock<WorkerStatus>>,
    worker: Option<JoinHandle<()>>,
    started: bool,
    recording: bool,
    pending_failure: Option<String>,
}

impl VideoRecorder {
    /// Open the capture device and create the command channels.
    ///
    /// Does not yet spawn the worker; call [`start`](Self::start) for that.
    /// Fails if the device named by `config.device_id` cannot be opened.
    #[instrument(name = "recorder_open", skip_all, fields(device_id = config.device_id))]
    pub fn open(backend: Arc<dyn MediaBackend>, config: RecorderConfig) -> RecorderResult<Self> {
        let camera = backend.open_camera(&config)?;
        let (command_tx, command_rx) = command_channel();
        let (event_tx, event_rx) = event_channel();

        info!(resolution = %config.resolution, codec = %config.codec, "Recorder opened");

        Ok(Self {
            backend,
            config,
            handoff: Some(WorkerHandoff {
                camera,
                command_rx,
                event_tx,
            }),
            command_tx,
            event_rx,
            status: Arc::new(RwLock::new(WorkerStatus::Idle)),
            worker: None,
            started: false,
            recording: false,
            pending_failure: None,
        })
    }

    /// Open a recorder backed by OpenCV.
    #[cfg(feature = "opencv")]
    pub fn open_opencv(config: RecorderConfig) -> RecorderResult<Self> {
        Self::open(Arc::new(recorder_media::OpenCvBackend::new()), config)
    }

    /// The configuration this recorder was opened with.
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// True between `start()` and `stop()`.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// The controller's belief about recording state.
    ///
    /// Set optimistically by `start_recording`/`stop_recording`; the
    /// worker-confirmed view is [`worker_status`](Self::worker_status).
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// Snapshot of the worker's own status cell.
    pub fn worker_status(&self) -> WorkerStatus {
        self.status.read().clone()
    }

    /// Spawn the capture worker thread.
    ///
    /// Fails if already started, or if `stop()` already released the
    /// camera (recorders are one-shot).
    #[instrument(name = "recorder_start", skip(self))]
    pub fn start(&mut self) -> RecorderResult<()> {
        if self.started {
            return Err(RecorderError::AlreadyStarted);
        }
        let handoff = self.handoff.take().ok_or(RecorderError::CameraReleased)?;

        let worker = CaptureWorker::new(
            handoff.camera,
            Arc::clone(&self.backend),
            self.config.clone(),
            handoff.command_rx,
            handoff.event_tx,
            Arc::clone(&self.status),
        );
        self.worker = Some(thread::spawn(move || worker.run()));
        self.started = true;

        info!("Capture worker spawned");
        Ok(())
    }

    /// Enqueue a `StartRecording` command for the given output file.
    ///
    /// Returns immediately without waiting for the worker to open the
    /// encoder; an encoder-open failure is surfaced by the next call on
    /// this recorder (or by [`health_check`](Self::health_check)).
    #[instrument(name = "recorder_start_recording", skip(self, output_path))]
    pub fn start_recording(&mut self, output_path: impl Into<PathBuf>) -> RecorderResult<()> {
        self.drain_events();
        if let Some(message) = self.pending_failure.take() {
            return Err(RecorderError::RecordingFailed { message });
        }
        if !self.started {
            return Err(RecorderError::NotStarted);
        }
        if self.recording {
            return Err(RecorderError::AlreadyRecording);
        }

        let output_path = output_path.into();
        info!(path = %output_path.display(), "Requesting recording start");
        self.send_command(RecorderCommand::StartRecording { output_path })?;
        self.recording = true;
        Ok(())
    }

    /// Enqueue a `StopRecording` command, finalizing the output file.
    #[instrument(name = "recorder_stop_recording", skip(self))]
    pub fn stop_recording(&mut self) -> RecorderResult<()> {
        self.drain_events();
        if let Some(message) = self.pending_failure.take() {
            return Err(RecorderError::RecordingFailed { message });
        }
        if !self.recording {
            return Err(RecorderError::NotRecording);
        }

        info!("Requesting recording stop");
        self.send_command(RecorderCommand::StopRecording)?;
        self.recording = false;
        Ok(())
    }

    /// Shut the worker down and release the camera.
    ///
    /// Sends `Shutdown` and joins the worker thread; the worker closes any
    /// open encoder before exiting, then drops the camera handle.
    #[instrument(name = "recorder_stop", skip(self))]
    pub fn stop(&mut self) -> RecorderResult<()> {
        if !self.started {
            return Err(RecorderError::NotStarted);
        }

        info!("Stopping recorder");
        // The worker may already have exited; joining is what matters.
        if self.command_tx.send(RecorderCommand::Shutdown).is_err() {
            debug!("Worker command channel already disconnected");
        }
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }

        self.started = false;
        self.recording = false;
        self.drain_events();
        self.pending_failure = None;

        info!("Recorder stopped");
        Ok(())
    }

    /// Surface any failure the worker reported since the last call.
    pub fn health_check(&mut self) -> RecorderResult<()> {
        self.drain_events();
        match self.pending_failure.take() {
            Some(message) => Err(RecorderError::RecordingFailed { message }),
            None => Ok(()),
        }
    }

    fn send_command(&self, command: RecorderCommand) -> RecorderResult<()> {
        self.command_tx
            .send(command)
            .map_err(|_| RecorderError::Disconnected)
    }

    /// Apply queued worker events to the controller's view.
    fn drain_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            debug!(?event, "Worker event");
            match event {
                RecorderEvent::RecordingStarted { .. } => {}
                RecorderEvent::RecordingStopped { .. } => {}
                RecorderEvent::RecordingFailed { message } => {
                    // The optimistic flag was wrong; correct it and hold
                    // the failure for the next caller to observe.
                    self.recording = false;
                    self.pending_failure = Some(message);
                }
                RecorderEvent::WorkerStopped => {
                    debug!("Worker reported exit");
                }
            }
        }
    }
}

impl Drop for VideoRecorder {
    fn drop(&mut self) {
        if self.started {
            let _ = self.command_tx.send(RecorderCommand::Shutdown);
            if let Some(handle) = self.worker.take() {
                let _ = handle.join();
            }
        }
    }
}
