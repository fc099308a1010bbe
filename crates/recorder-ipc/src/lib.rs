//! Typed controller<->worker messages for the webcam recorder.
//!
//! This crate defines the command, event, and status types exchanged
//! between the recorder controller and the capture worker thread.

mod commands;
mod events;
mod state;
mod types;

pub use commands::RecorderCommand;
pub use events::RecorderEvent;
pub use state::WorkerStatus;
pub use types::{FourCc, FourCcError, RecorderConfig, Resolution};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for commands (controller → worker).
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity for events (worker → controller).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Creates a bounded command channel.
pub fn command_channel() -> (Sender<RecorderCommand>, Receiver<RecorderCommand>) {
    crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY)
}

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<RecorderEvent>, Receiver<RecorderEvent>) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY)
}
