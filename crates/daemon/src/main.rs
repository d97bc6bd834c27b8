// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! tempod - high-resolution timer daemon
//!
//! Subprocess that multiplexes named timeouts and intervals over a line
//! protocol: commands on stdin, events on stdout, diagnostics on
//! stderr. Runs until stdin is closed by the controlling parent.

use std::process::ExitCode;

use clap::Parser;
use tempo_core::{Registry, StdoutSink, SystemClock};
use tokio::io::BufReader;
use tracing::{debug, error};

const AFTER_HELP: &str = "\
Commands (sent via stdin, one per line):
  setTimeout <id> <duration>    Set a timeout with a unique ID and duration
  clearTimeout <id>             Clear a timeout with the given ID
  setInterval <id> <duration>   Set an interval with a unique ID and duration
  clearInterval <id>            Clear an interval with the given ID

Duration format, an integer followed by a unit:
  s - seconds (e.g. 2s)
  m - milliseconds (e.g. 500m)
  u - microseconds (e.g. 1000u)
  n - nanoseconds (e.g. 500000n)

Events (written to stdout, one per line):
  timeout <id> <elapsedNanos>
  clearedTimeout <id> <elapsedNanos>
  interval <id>";

/// High-resolution timer subprocess
#[derive(Parser)]
#[command(
    name = "tempod",
    version,
    about = "Multiplexes named timeouts and intervals over stdin/stdout",
    after_help = AFTER_HELP
)]
struct Cli {
    /// Enable debug output on stderr
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    debug!("waiting for commands");

    let registry = Registry::new(SystemClock, StdoutSink::new());
    let stdin = BufReader::new(tokio::io::stdin());

    match tempo_daemon::dispatch::run(stdin, &registry).await {
        Ok(()) => {
            debug!("input closed, shutting down");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("error reading input: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(debug: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // The explicit flag wins over the environment; stderr carries only
    // human-readable diagnostics and is never parsed
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
