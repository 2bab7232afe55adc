// SPDX-License-Identifier: MIT

//! tetherd: run a command behind a pseudo-terminal and serve it over TCP.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tether_daemon::env;
use tether_daemon::lifecycle::{self, Config, LifecycleError};
use tether_daemon::listener::{ListenCtx, Listener};

#[derive(Debug, Parser)]
#[command(name = "tetherd", version, about = "PTY command proxy daemon")]
struct Cli {
    /// Command line to run inside the pseudo-terminal
    command: String,

    /// Extra argument appended to the command (repeatable)
    #[arg(long = "arg")]
    args: Vec<String>,

    /// Display name for the process (defaults to the command)
    #[arg(long)]
    name: Option<String>,

    /// Working directory for the child
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Extra KEY=VALUE environment variable for the child (repeatable)
    #[arg(long = "env", value_parser = parse_env_pair)]
    env: Vec<(String, String)>,

    /// TCP port to listen on (0 picks an ephemeral port)
    #[arg(long, default_value_t = env::port())]
    port: u16,

    /// Log buffer capacity in entries
    #[arg(long, default_value_t = env::log_capacity())]
    log_capacity: usize,
}

fn parse_env_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {s:?}")),
    }
}

#[tokio::main]
async fn main() -> Result<(), LifecycleError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config {
        name: cli.name.unwrap_or_else(|| cli.command.clone()),
        command: cli.command,
        args: cli.args,
        cwd: cli.cwd,
        env: cli.env,
        log_capacity: cli.log_capacity,
        port: cli.port,
    };

    let result = lifecycle::startup(config).await?;
    let runner = Arc::clone(&result.runner);
    let shutdown = Arc::clone(&result.shutdown);

    // Handshake line for supervisors and tests. Stdout only carries this;
    // all logging goes to stderr.
    println!("READY port={}", result.local_port);

    let ctx = Arc::new(ListenCtx { runner: Arc::clone(&runner), shutdown: Arc::clone(&shutdown) });
    tokio::spawn(Listener::new(result.listener, ctx).run());

    wait_for_shutdown(&shutdown).await?;

    runner.stop();
    lifecycle::drain(&runner, env::drain_timeout()).await;
    info!("daemon exiting");
    Ok(())
}

/// Block until a client Shutdown request or a termination signal arrives.
async fn wait_for_shutdown(shutdown: &Notify) -> Result<(), LifecycleError> {
    let mut sigterm = signal(SignalKind::terminate())?;
    tokio::select! {
        _ = shutdown.notified() => info!("shutdown requested by client"),
        _ = tokio::signal::ctrl_c() => info!("interrupt received"),
        _ = sigterm.recv() => info!("SIGTERM received"),
    }
    Ok(())
}
