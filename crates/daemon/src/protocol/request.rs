// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use tether_core::LogKind;

/// Request from a client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Version handshake
    Hello { version: String },

    /// Retrieve recent log entries
    GetLogs {
        /// Only return entries of this kind
        #[serde(default, skip_serializing_if = "Option::is_none")]
        kind: Option<LogKind>,
        /// Truncate to the most recent N entries
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tail: Option<usize>,
    },

    /// Query current process status
    GetStatus,

    /// Forward a string verbatim to the process's input
    SendInput { data: String },

    /// Send a symbolic key (`enter`, `tab`, arrow keys, ...) mapped to
    /// its control sequence before delivery
    SendKey { key: String },

    /// Stop the child process and shut down the daemon
    Shutdown,
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
