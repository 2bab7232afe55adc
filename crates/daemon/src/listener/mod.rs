// SPDX-License-Identifier: MIT

//! Listener task for handling client connections.
//!
//! The Listener runs in a spawned task, accepting TCP connections and
//! handling them without blocking the daemon's main loop. Each request
//! is dispatched against the shared runner.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use tether_core::{LogKind, ProcessStatus};
use tether_runner::CommandRunner;

use crate::env::{ipc_timeout, PROTOCOL_VERSION};
use crate::keymap;
use crate::protocol::{self, Request, Response};

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub runner: Arc<CommandRunner>,
    /// Notified when a client requests shutdown.
    pub shutdown: Arc<Notify>,
}

/// Listener task for accepting client connections.
pub struct Listener {
    tcp: TcpListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

impl Listener {
    pub fn new(tcp: TcpListener, ctx: Arc<ListenCtx>) -> Self {
        Self { tcp, ctx }
    }

    /// Run the accept loop, spawning a task per connection.
    pub async fn run(self) {
        loop {
            match self.tcp.accept().await {
                Ok((stream, addr)) => {
                    debug!("connection from {}", addr);
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        let (reader, writer) = stream.into_split();
                        if let Err(e) = handle_connection(reader, writer, &ctx).await {
                            log_connection_error(e);
                        }
                    });
                }
                Err(e) => error!("accept error: {}", e),
            }
        }
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(protocol::ProtocolError::ConnectionClosed) => {
            debug!("client disconnected")
        }
        ConnectionError::Protocol(protocol::ProtocolError::Timeout) => {
            warn!("connection timeout")
        }
        _ => error!("connection error: {}", e),
    }
}

/// Handle a single client connection: one request, one response.
///
/// Generic over reader/writer types so tests can drive it with in-memory
/// duplex streams.
pub async fn handle_connection<R, W>(
    mut reader: R,
    mut writer: W,
    ctx: &ListenCtx,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let request = protocol::read_request(&mut reader, ipc_timeout()).await?;

    // Log queries at debug level (frequent polling), other requests at info
    if matches!(request, Request::GetLogs { .. } | Request::GetStatus) {
        debug!(request = ?request, "received query");
    } else {
        info!(request = ?request, "received request");
    }

    let response = handle_request(request, ctx);
    debug!("sending response: {:?}", response);

    protocol::write_response(&mut writer, &response, ipc_timeout()).await?;
    Ok(())
}

/// Dispatch a single request against the runner.
fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => {
            Response::Hello { version: PROTOCOL_VERSION.to_string() }
        }

        Request::GetLogs { kind, tail } => handle_get_logs(&ctx.runner, kind, tail),

        Request::GetStatus => Response::Status { status: ctx.runner.status() },

        Request::SendInput { data } => {
            ctx.runner.write(&data);
            Response::Ok
        }

        Request::SendKey { key } => match keymap::key_sequence(&key) {
            Some(sequence) => {
                ctx.runner.write(sequence);
                Response::Ok
            }
            None => Response::Error { message: format!("unknown key: {}", key) },
        },

        Request::Shutdown => {
            if ctx.runner.status() == ProcessStatus::Running {
                ctx.runner.stop();
            }
            ctx.shutdown.notify_one();
            Response::ShuttingDown
        }
    }
}

/// Snapshot the log, optionally filtered by kind and truncated to the
/// most recent `tail` entries.
fn handle_get_logs(
    runner: &CommandRunner,
    kind: Option<LogKind>,
    tail: Option<usize>,
) -> Response {
    let mut entries = runner.logs();
    if let Some(kind) = kind {
        entries.retain(|e| e.kind == kind);
    }
    if let Some(tail) = tail {
        let start = entries.len().saturating_sub(tail);
        entries.drain(..start);
    }
    Response::Logs { entries }
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
