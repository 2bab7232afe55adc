// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tether-runner: Owns a child process bound to a pseudo-terminal.
//!
//! The [`CommandRunner`] spawns the configured command inside a PTY,
//! captures its output chunks into a bounded in-memory log, tracks the
//! process status state machine, and notifies subscribers of every log
//! append and status transition.

mod runner;
mod subscribe;

pub use runner::{CommandRunner, RunnerConfig, RunnerError};
pub use subscribe::SubscriptionId;
