// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use tether_core::{LogEntry, ProcessStatus};

/// Response from the daemon to a client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Reply to `Ping`
    Pong,

    /// Reply to `Hello`
    Hello { version: String },

    /// Log snapshot, oldest first
    Logs { entries: Vec<LogEntry> },

    /// Current process status
    Status { status: ProcessStatus },

    /// Generic success
    Ok,

    /// Shutdown acknowledged; the daemon exits after draining
    ShuttingDown,

    /// Request failed
    Error { message: String },
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
