// SPDX-License-Identifier: MIT

//! Notifications emitted by the command runner.

use serde::{Deserialize, Serialize};

use crate::log::LogEntry;
use crate::status::ProcessStatus;

/// Observable runner state change, delivered synchronously to subscribers
/// in the order the underlying mutation occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RunnerEvent {
    /// A log entry was appended.
    Log { entry: LogEntry },

    /// The process status changed.
    StatusChange { status: ProcessStatus },

    /// The child process terminated.
    ///
    /// `signal` is always `None` with the current PTY backend, which folds
    /// termination signals into the exit code; the field is part of the
    /// wire contract regardless.
    Exit { code: i32, signal: Option<i32> },

    /// The child process could not be spawned.
    Error { message: String },
}

impl RunnerEvent {
    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            RunnerEvent::Log { .. } => "log",
            RunnerEvent::StatusChange { .. } => "statusChange",
            RunnerEvent::Exit { .. } => "exit",
            RunnerEvent::Error { .. } => "error",
        }
    }
}
