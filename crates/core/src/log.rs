// SPDX-License-Identifier: MIT

//! Bounded, insertion-ordered log storage.
//!
//! `RingLog` holds the most recent `capacity` entries of child-process
//! output. Pushing past capacity evicts exactly the oldest entry; survivors
//! are never reordered.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Origin of a log entry.
///
/// A pseudo-terminal merges the child's stderr into the same stream as
/// stdout, so the runner only ever produces `Stdout` and `System` entries.
/// `Stderr` is kept in the data model for wire-format completeness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Stdout,
    Stderr,
    /// Operational message from the runner itself.
    System,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Stdout => "stdout",
            LogKind::Stderr => "stderr",
            LogKind::System => "system",
        }
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single captured output chunk or runner message.
///
/// Immutable once created; `content` is not necessarily a full line, since
/// PTY output arrives as arbitrary byte chunks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Wall-clock creation time in epoch milliseconds.
    pub at_ms: u64,
    pub kind: LogKind,
    pub content: String,
}

impl LogEntry {
    pub fn new(at_ms: u64, kind: LogKind, content: impl Into<String>) -> Self {
        Self { at_ms, kind, content: content.into() }
    }
}

/// Errors from `RingLog` construction.
#[derive(Debug, Error)]
pub enum RingLogError {
    #[error("log capacity must be at least 1")]
    ZeroCapacity,
}

/// Fixed-capacity FIFO log store.
///
/// Not internally synchronized; the runner wraps it in its own lock.
#[derive(Debug, Clone)]
pub struct RingLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl RingLog {
    /// Create a store with the given fixed capacity. Rejects zero.
    pub fn new(capacity: usize) -> Result<Self, RingLogError> {
        if capacity == 0 {
            return Err(RingLogError::ZeroCapacity);
        }
        Ok(Self { entries: VecDeque::with_capacity(capacity), capacity })
    }

    /// Append an entry, evicting the oldest when at capacity.
    pub fn push(&mut self, entry: LogEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Snapshot of retained entries, oldest first.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop all entries; capacity is unchanged.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
