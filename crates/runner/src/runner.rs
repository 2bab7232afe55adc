// SPDX-License-Identifier: MIT

//! Command execution inside a pseudo-terminal.

use std::io::{ErrorKind, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use portable_pty::{native_pty_system, ChildKiller, CommandBuilder, MasterPty, PtySize};
use thiserror::Error;
use tracing::{debug, info, warn};

use tether_core::{Clock, LogEntry, LogKind, ProcessStatus, RingLog, RingLogError, RunnerEvent};

use crate::subscribe::{Registry, SubscriptionId};

/// Fixed terminal geometry for the child PTY.
const PTY_ROWS: u16 = 30;
const PTY_COLS: u16 = 80;

/// Construction-time configuration for a [`CommandRunner`].
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Display-name prefix used in trace output.
    pub name: String,
    /// Command line; split on whitespace, no shell quoting.
    pub command: String,
    /// Extra arguments appended after the split command.
    pub args: Vec<String>,
    /// Working directory for the child.
    pub cwd: Option<PathBuf>,
    /// Environment overrides, applied after the color-forcing defaults.
    pub env: Vec<(String, String)>,
    /// Bounded log capacity.
    pub log_capacity: usize,
}

/// Errors from runner construction.
///
/// Runtime failures (spawn, write) are never returned to callers; they are
/// surfaced through the log stream and `error`/`exit` notifications.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("command is empty")]
    EmptyCommand,

    #[error(transparent)]
    Log(#[from] RingLogError),
}

/// Handles to a live child process. Exactly one exists while `Running`;
/// the exit observer clears it when the process terminates.
struct ChildHandle {
    killer: Box<dyn ChildKiller + Send + Sync>,
    writer: Box<dyn Write + Send>,
    // Keeps the PTY master side open for the lifetime of the child.
    _master: Box<dyn MasterPty + Send>,
}

struct RunnerState {
    log: RingLog,
    status: ProcessStatus,
    child: Option<ChildHandle>,
    /// Incremented per spawn; observers from a previous run compare against
    /// this and drop their updates after a restart.
    generation: u64,
}

struct Shared<C: Clock> {
    name: String,
    clock: C,
    /// Serializes every mutate+notify pair across direct calls and the
    /// output/exit observer threads, preserving append order.
    op_lock: Mutex<()>,
    state: Mutex<RunnerState>,
    subscribers: Mutex<Registry>,
}

impl<C: Clock> Shared<C> {
    /// Run a mutation with the operation lock held, then deliver the
    /// events it produced. State lock is released before delivery, so
    /// subscribers may call `logs()`/`status()` — but must not
    /// subscribe or unsubscribe from inside a callback.
    fn with_op<R>(&self, f: impl FnOnce(&mut RunnerState, &mut OpEvents<'_, C>) -> R) -> R {
        let _guard = self.op_lock.lock();
        let mut events = OpEvents { clock: &self.clock, queued: Vec::new() };
        let result = {
            let mut state = self.state.lock();
            f(&mut state, &mut events)
        };
        let subscribers = self.subscribers.lock();
        for event in &events.queued {
            subscribers.emit(event);
        }
        result
    }

    /// Output observer: append one chunk as a `stdout` entry.
    fn on_output(&self, generation: u64, chunk: &[u8]) {
        let content = String::from_utf8_lossy(chunk).into_owned();
        self.with_op(|state, events| {
            if state.generation != generation {
                return;
            }
            events.append(state, LogKind::Stdout, content);
        });
    }

    /// Exit observer: record the summary, release the child handle, and
    /// transition to `Stopped`.
    fn on_exit(&self, generation: u64, code: i32) {
        self.with_op(|state, events| {
            if state.generation != generation {
                return;
            }
            events.append(state, LogKind::System, format!("process exited with code {code}"));
            state.child = None;
            state.status = ProcessStatus::Stopped;
            events.status_change(ProcessStatus::Stopped);
            events.queued.push(RunnerEvent::Exit { code, signal: None });
        });
        info!(runner = %self.name, code, "process exited");
    }
}

/// Events queued during one serialized operation.
struct OpEvents<'a, C: Clock> {
    clock: &'a C,
    queued: Vec<RunnerEvent>,
}

impl<C: Clock> OpEvents<'_, C> {
    fn append(&mut self, state: &mut RunnerState, kind: LogKind, content: impl Into<String>) {
        let entry = LogEntry::new(self.clock.epoch_ms(), kind, content);
        state.log.push(entry.clone());
        self.queued.push(RunnerEvent::Log { entry });
    }

    fn status_change(&mut self, status: ProcessStatus) {
        self.queued.push(RunnerEvent::StatusChange { status });
    }
}

/// Owns at most one child process attached to a pseudo-terminal and the
/// bounded log of its output.
///
/// All operations are safe to call from multiple threads; output and exit
/// notifications from the PTY are serialized with direct calls.
pub struct CommandRunner<C: Clock = tether_core::SystemClock> {
    program: String,
    args: Vec<String>,
    cwd: Option<PathBuf>,
    env: Vec<(String, String)>,
    shared: Arc<Shared<C>>,
}

impl<C: Clock> CommandRunner<C> {
    /// Build a runner from configuration. The command string is split on
    /// whitespace; `config.args` are appended verbatim.
    pub fn new(config: RunnerConfig, clock: C) -> Result<Self, RunnerError> {
        let mut parts = config.command.split_whitespace().map(str::to_string);
        let program = parts.next().ok_or(RunnerError::EmptyCommand)?;
        let mut args: Vec<String> = parts.collect();
        args.extend(config.args);

        let log = RingLog::new(config.log_capacity)?;
        Ok(Self {
            program,
            args,
            cwd: config.cwd,
            env: config.env,
            shared: Arc::new(Shared {
                name: config.name,
                clock,
                op_lock: Mutex::new(()),
                state: Mutex::new(RunnerState {
                    log,
                    status: ProcessStatus::Stopped,
                    child: None,
                    generation: 0,
                }),
                subscribers: Mutex::new(Registry::default()),
            }),
        })
    }

    /// Spawn the child process in a fresh 80x30 PTY.
    ///
    /// A no-op (recorded as a `system` entry) when a child handle is
    /// already live. Spawn failure transitions to `Error` and emits an
    /// `error` notification; it is not retried.
    pub fn start(&self) {
        self.shared.with_op(|state, events| {
            if state.child.is_some() {
                warn!(runner = %self.shared.name, "start requested but process already running");
                events.append(state, LogKind::System, "start ignored: process already running");
                return;
            }

            let command_display = if self.args.is_empty() {
                self.program.clone()
            } else {
                format!("{} {}", self.program, self.args.join(" "))
            };
            events.append(state, LogKind::System, format!("starting: {command_display}"));

            match self.spawn_child() {
                Ok((handle, reader, child)) => {
                    state.child = Some(handle);
                    state.status = ProcessStatus::Running;
                    state.generation += 1;
                    events.status_change(ProcessStatus::Running);
                    info!(runner = %self.shared.name, command = %command_display, "process started");

                    let generation = state.generation;
                    spawn_output_observer(Arc::clone(&self.shared), generation, reader);
                    spawn_exit_observer(Arc::clone(&self.shared), generation, child);
                }
                Err(message) => {
                    warn!(runner = %self.shared.name, error = %message, "spawn failed");
                    events.append(state, LogKind::System, format!("spawn failed: {message}"));
                    // A retry that fails again is already in Error.
                    if state.status != ProcessStatus::Error {
                        state.status = ProcessStatus::Error;
                        events.status_change(ProcessStatus::Error);
                    }
                    events.queued.push(RunnerEvent::Error { message });
                }
            }
        });
    }

    /// Send a termination signal to the child. Pure no-op unless a
    /// process is running; exit is observed asynchronously.
    pub fn stop(&self) {
        self.shared.with_op(|state, events| {
            if !state.status.is_running() || state.child.is_none() {
                debug!(runner = %self.shared.name, "stop requested but process not running");
                return;
            }
            events.append(state, LogKind::System, "stopping process");
            if let Some(child) = state.child.as_mut() {
                if let Err(e) = child.killer.kill() {
                    warn!(runner = %self.shared.name, error = %e, "kill signal failed");
                }
            }
        });
    }

    /// Forward `data` verbatim to the child's input stream.
    ///
    /// Rejected (one `system` entry) unless a process is running.
    /// Delivery failures are logged, never returned.
    pub fn write(&self, data: &str) {
        self.shared.with_op(|state, events| {
            if !state.status.is_running() || state.child.is_none() {
                events.append(
                    state,
                    LogKind::System,
                    format!("input rejected ({} bytes): process not running", data.len()),
                );
                return;
            }
            events.append(state, LogKind::System, format!("sending {} bytes", data.len()));
            let result = match state.child.as_mut() {
                Some(child) => {
                    child.writer.write_all(data.as_bytes()).and_then(|()| child.writer.flush())
                }
                None => Ok(()),
            };
            match result {
                Ok(()) => events.append(state, LogKind::System, "input delivered"),
                Err(e) => {
                    events.append(state, LogKind::System, format!("input delivery failed: {e}"));
                }
            }
        });
    }

    /// Snapshot of retained log entries, oldest first.
    pub fn logs(&self) -> Vec<LogEntry> {
        self.shared.state.lock().log.snapshot()
    }

    pub fn status(&self) -> ProcessStatus {
        self.shared.state.lock().status
    }

    pub fn log_capacity(&self) -> usize {
        self.shared.state.lock().log.capacity()
    }

    /// Register a callback for runner notifications. Events that fired
    /// before registration are not replayed.
    pub fn subscribe(&self, callback: impl Fn(&RunnerEvent) + Send + 'static) -> SubscriptionId {
        self.shared.subscribers.lock().add(Box::new(callback))
    }

    /// Remove a previously registered callback.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.shared.subscribers.lock().remove(id);
    }

    /// Open the PTY and spawn the child, returning the live handle plus
    /// the reader and child for the observer threads. Any failure along
    /// the way is reported as a spawn failure.
    #[allow(clippy::type_complexity)]
    fn spawn_child(
        &self,
    ) -> Result<
        (ChildHandle, Box<dyn Read + Send>, Box<dyn portable_pty::Child + Send + Sync>),
        String,
    > {
        let pty = native_pty_system();
        let pair = pty
            .openpty(PtySize {
                rows: PTY_ROWS,
                cols: PTY_COLS,
                pixel_width: 0,
                pixel_height: 0,
            })
            .map_err(|e| e.to_string())?;

        let mut cmd = CommandBuilder::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref cwd) = self.cwd {
            cmd.cwd(cwd);
        }
        // Force colorized, full-capability terminal output; explicit
        // overrides from the configuration win.
        cmd.env("TERM", "xterm-256color");
        cmd.env("COLORTERM", "truecolor");
        cmd.env("FORCE_COLOR", "1");
        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let child = pair.slave.spawn_command(cmd).map_err(|e| e.to_string())?;
        // Close our copy of the slave so the reader sees EOF on exit.
        drop(pair.slave);

        let killer = child.clone_killer();
        let reader = pair.master.try_clone_reader().map_err(|e| e.to_string())?;
        let writer = pair.master.take_writer().map_err(|e| e.to_string())?;

        Ok((ChildHandle { killer, writer, _master: pair.master }, reader, child))
    }
}

/// Dedicated thread that reads PTY output chunks as they arrive.
fn spawn_output_observer<C: Clock>(
    shared: Arc<Shared<C>>,
    generation: u64,
    mut reader: Box<dyn Read + Send>,
) {
    std::thread::spawn(move || {
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => shared.on_output(generation, &buf[..n]),
                Err(ref e) if e.kind() == ErrorKind::Interrupted => continue,
                // EIO is the normal close signal for a PTY master.
                Err(_) => break,
            }
        }
        debug!("output observer finished");
    });
}

/// Dedicated thread that blocks on child exit and reports the result.
fn spawn_exit_observer<C: Clock>(
    shared: Arc<Shared<C>>,
    generation: u64,
    mut child: Box<dyn portable_pty::Child + Send + Sync>,
) {
    std::thread::spawn(move || {
        let code = match child.wait() {
            Ok(status) => status.exit_code() as i32,
            Err(_) => -1,
        };
        shared.on_exit(generation, code);
    });
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
