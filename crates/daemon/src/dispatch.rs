// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatch loop
//!
//! Reads one command per line from the input stream and routes it to
//! the registry. Bad lines are logged and skipped; one malformed
//! command never aborts the loop or touches registry state. Only a
//! failure of the input stream itself ends the loop.

use tempo_core::{Clock, Command, EventSink, Registry};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

/// Drive the registry from a line-oriented input stream until EOF.
///
/// Returns `Ok(())` when the stream is exhausted, or the I/O error if
/// reading the stream itself fails.
pub async fn run<R, C, S>(reader: R, registry: &Registry<C, S>) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    C: Clock,
    S: EventSink,
{
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        debug!(line = %line, "received line");
        match Command::parse(&line) {
            Ok(command) => apply(registry, command).await,
            Err(e) => debug!(error = %e, "rejected command"),
        }
    }
    Ok(())
}

/// Route a parsed command to the matching registry operation.
pub async fn apply<C: Clock, S: EventSink>(registry: &Registry<C, S>, command: Command) {
    match command {
        Command::SetTimeout { id, duration } => registry.set_timeout(&id, duration),
        Command::ClearTimeout { id } => registry.clear_timeout(&id).await,
        Command::SetInterval { id, duration } => registry.set_interval(&id, duration),
        Command::ClearInterval { id } => registry.clear_interval(&id),
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
