// SPDX-License-Identifier: MIT

//! tether-daemon: Remote-control transport for a PTY-proxied command.
//!
//! Exposes the runner's operations (log retrieval, input injection,
//! status, shutdown) to clients over a length-prefixed JSON protocol
//! on TCP. The protocol types are public for use by client tooling.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod env;
pub mod keymap;
pub mod lifecycle;
pub mod listener;
pub mod protocol;

pub use lifecycle::{startup, Config, LifecycleError, StartupResult};
pub use protocol::{Request, Response};
