// SPDX-License-Identifier: MIT

//! Daemon lifecycle management: startup, shutdown, drain.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

use tether_core::{ProcessStatus, SystemClock};
use tether_runner::{CommandRunner, RunnerConfig, RunnerError};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Display name for the proxied process
    pub name: String,
    /// Command line to run (split on whitespace)
    pub command: String,
    /// Extra arguments appended after the command line
    pub args: Vec<String>,
    /// Working directory for the child
    pub cwd: Option<PathBuf>,
    /// Extra environment variables for the child
    pub env: Vec<(String, String)>,
    /// Bounded log capacity
    pub log_capacity: usize,
    /// TCP port to listen on (0 picks an ephemeral port)
    pub port: u16,
}

/// Result of daemon startup - includes both the runner and the listener.
pub struct StartupResult {
    /// The shared runner, already started
    pub runner: Arc<CommandRunner>,
    /// The TCP listener to spawn as a Listener task
    pub listener: TcpListener,
    /// Notified when a client requests shutdown
    pub shutdown: Arc<Notify>,
    /// The bound port (resolved when `config.port` was 0)
    pub local_port: u16,
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to bind 127.0.0.1:{0}: {1}")]
    BindFailed(u16, #[source] std::io::Error),

    #[error("Runner error: {0}")]
    Runner(#[from] RunnerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon: build the runner, bind the socket, launch the child.
pub async fn startup(config: Config) -> Result<StartupResult, LifecycleError> {
    let runner_config = RunnerConfig {
        name: config.name.clone(),
        command: config.command,
        args: config.args,
        cwd: config.cwd,
        env: config.env,
        log_capacity: config.log_capacity,
    };
    let runner = Arc::new(CommandRunner::new(runner_config, SystemClock)?);

    // Bind before launching the child so a port conflict leaves nothing running.
    let listener = TcpListener::bind(("127.0.0.1", config.port))
        .await
        .map_err(|e| LifecycleError::BindFailed(config.port, e))?;
    let local_port = listener.local_addr()?.port();

    // Spawn failures are reported through the log and status, not here:
    // the daemon stays up so clients can read the error.
    runner.start();

    info!(name = %config.name, port = local_port, "daemon started");

    Ok(StartupResult { runner, listener, shutdown: Arc::new(Notify::new()), local_port })
}

/// Wait for the child to finish exiting, up to `timeout`.
///
/// The exit observer runs on its own thread; this polls status so the
/// daemon can record the final exit entry before the process ends.
pub async fn drain(runner: &CommandRunner, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    while runner.status() == ProcessStatus::Running {
        if Instant::now() >= deadline {
            warn!("drain timeout: child still running at shutdown");
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    info!("child drained");
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
