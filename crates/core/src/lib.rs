// SPDX-License-Identifier: MIT

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tether-core: Leaf types for the tether PTY proxy daemon.
//!
//! Everything here is transport-agnostic: the bounded log, the process
//! status state machine values, runner notifications, and the clock
//! abstraction used to timestamp log entries.

pub mod clock;
pub mod event;
pub mod log;
pub mod status;

pub use clock::{Clock, FakeClock, SystemClock};
pub use event::RunnerEvent;
pub use log::{LogEntry, LogKind, RingLog, RingLogError};
pub use status::ProcessStatus;
