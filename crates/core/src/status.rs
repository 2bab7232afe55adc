// SPDX-License-Identifier: MIT

//! Process status state machine values.

use serde::{Deserialize, Serialize};

/// Lifecycle state of the proxied child process.
///
/// Transitions: `Stopped -> Running` on successful spawn,
/// `Running -> Stopped` on exit (normal or signalled), and
/// `Stopped -> Error` when the spawn itself fails. Both `Stopped` and
/// `Error` permit a fresh `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessStatus {
    Stopped,
    Running,
    Error,
}

impl ProcessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessStatus::Stopped => "stopped",
            ProcessStatus::Running => "running",
            ProcessStatus::Error => "error",
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ProcessStatus::Running)
    }
}

impl std::fmt::Display for ProcessStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
