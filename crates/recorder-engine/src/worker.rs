//! The capture worker loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::RwLock;
use tracing::{debug, info, instrument, warn};

use recorder_ipc::{RecorderCommand, RecorderConfig, RecorderEvent, WorkerStatus};
use recorder_media::{CameraDevice, MediaBackend, VideoWriter};

/// How long the worker blocks waiting for a command while idle.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Interval between periodic capture stats log lines.
const STATS_LOG_INTERVAL: Duration = Duration::from_secs(5);

/// The background capture worker.
///
/// Owns the camera for its lifetime and an encoder while recording. Runs
/// until it receives `Shutdown` or the command channel disconnects; either
/// way any open encoder is closed before the thread exits, so output files
/// are always finalized.
pub(crate) struct CaptureWorker {
    camera: Box<dyn CameraDevice>,
    backend: Arc<dyn MediaBackend>,
    config: RecorderConfig,
    command_rx: Receiver<RecorderCommand>,
    event_tx: Sender<RecorderEvent>,
    status: Arc<RwLock<WorkerStatus>>,
    writer: Option<(PathBuf, Box<dyn VideoWriter>)>,
    frames_captured: u64,
    frames_missed: u64,
    last_stats_log: Instant,
}

impl CaptureWorker {
    pub(crate) fn new(
        camera: Box<dyn CameraDevice>,
        backend: Arc<dyn MediaBackend>,
        config: RecorderConfig,
        command_rx: Receiver<RecorderCommand>,
        event_tx: Sender<RecorderEvent>,
        status: Arc<RwLock<WorkerStatus>>,
    ) -> Self {
        Self {
            camera,
            backend,
            config,
            command_rx,
            event_tx,
            status,
            writer: None,
            frames_captured: 0,
            frames_missed: 0,
            last_stats_log: Instant::now(),
        }
    }

    /// Run the capture loop (blocking).
    ///
    /// Each iteration applies at most one queued command, then reads and
    /// writes at most one frame if an encoder is open. While idle the loop
    /// blocks in a timed receive instead of spinning.
    #[instrument(name = "capture_worker", skip(self))]
    pub(crate) fn run(mut self) {
        info!("Capture worker starting");

        loop {
            let command = if self.writer.is_some() {
                // Never block while recording; frame polling comes first.
                match self.command_rx.try_recv() {
                    Ok(command) => Some(command),
                    Err(TryRecvError::Empty) => None,
                    Err(TryRecvError::Disconnected) => break,
                }
            } else {
                match self.command_rx.recv_timeout(IDLE_POLL_INTERVAL) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            };

            if let Some(command) = command {
                debug!(?command, "Handling command");
                if !self.handle_command(command) {
                    break;
                }
            }

            if self.writer.is_some() {
                self.capture_frame();
                self.log_stats();
            }
        }

        // Shutdown and disconnect both finalize any open recording.
        self.finish_recording();
        self.set_status(WorkerStatus::Stopped);
        self.send_event(RecorderEvent::WorkerStopped);
        info!(
            frames_captured = self.frames_captured,
            frames_missed = self.frames_missed,
            "Capture worker stopped"
        );
    }

    /// Apply one command. Returns false if the worker should exit.
    fn handle_command(&mut self, command: RecorderCommand) -> bool {
        match command {
            RecorderCommand::StartRecording { output_path } => {
                self.start_recording(output_path);
                true
            }
            RecorderCommand::StopRecording => {
                self.stop_recording();
                true
            }
            RecorderCommand::Shutdown => false,
        }
    }

    fn start_recording(&mut self, path: PathBuf) {
        if self.writer.is_some() {
            // Reachable only through a controller/worker race; finalize the
            // previous file rather than leaking an unflushed writer.
            warn!("Start command while already recording, closing previous writer");
            self.finish_recording();
        }

        match self.backend.open_writer(&path, &self.config) {
            Ok(writer) => {
                info!(path = %path.display(), codec = %self.config.codec, "Recording started");
                self.set_status(WorkerStatus::Recording { path: path.clone() });
                self.send_event(RecorderEvent::RecordingStarted { path: path.clone() });
                self.writer = Some((path, writer));
            }
            Err(err) => {
                let message = err.to_string();
                warn!(%message, "Failed to open video writer");
                self.set_status(WorkerStatus::Failed {
                    message: message.clone(),
                });
                self.send_event(RecorderEvent::RecordingFailed { message });
            }
        }
    }

    fn stop_recording(&mut self) {
        if self.writer.is_none() {
            // Reachable via the start-failure race, not via API misuse.
            warn!("Stop command with no open writer, ignoring");
            return;
        }
        self.finish_recording();
    }

    /// Close the open writer, if any, and report the outcome.
    fn finish_recording(&mut self) {
        let Some((path, mut writer)) = self.writer.take() else {
            return;
        };

        let frames_written = writer.frames_written();
        if let Err(err) = writer.close() {
            let message = err.to_string();
            warn!(path = %path.display(), %message, "Failed to finalize output file");
            self.set_status(WorkerStatus::Failed {
                message: message.clone(),
            });
            self.send_event(RecorderEvent::RecordingFailed { message });
            return;
        }

        info!(path = %path.display(), frames_written, "Recording stopped");
        self.set_status(WorkerStatus::Idle);
        self.send_event(RecorderEvent::RecordingStopped {
            path,
            frames_written,
        });
    }

    /// Read one frame and append it to the open writer.
    ///
    /// A missed or failed read is skipped, not an error; a failed write
    /// ends the recording session but not the worker.
    fn capture_frame(&mut self) {
        let frame = match self.camera.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                self.frames_missed += 1;
                return;
            }
            Err(err) => {
                self.frames_missed += 1;
                debug!(error = %err, "Frame read failed, skipping");
                return;
            }
        };

        self.frames_captured += 1;

        let write_result = match self.writer.as_mut() {
            Some((_, writer)) => writer.write(&frame),
            None => return,
        };

        if let Err(err) = write_result {
            let message = err.to_string();
            warn!(%message, "Frame write failed, aborting recording");
            if let Some((_, mut writer)) = self.writer.take() {
                let _ = writer.close();
            }
            self.set_status(WorkerStatus::Failed {
                message: message.clone(),
            });
            self.send_event(RecorderEvent::RecordingFailed { message });
        }
    }

    fn log_stats(&mut self) {
        if self.last_stats_log.elapsed() >= STATS_LOG_INTERVAL {
            info!(
                frames_captured = self.frames_captured,
                frames_missed = self.frames_missed,
                status = self.status.read().name(),
                "Capture stats"
            );
            self.last_stats_log = Instant::now();
        }
    }

    fn set_status(&self, status: WorkerStatus) {
        debug!(status = status.name(), "Worker status transition");
        *self.status.write() = status;
    }

    fn send_event(&self, event: RecorderEvent) {
        if let Err(e) = self.event_tx.try_send(event) {
            warn!("Failed to send event: {}", e);
        }
    }
}
