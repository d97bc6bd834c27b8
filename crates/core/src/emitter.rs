// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared output sink for wire events
//!
//! Emissions originate both from the dispatch loop and from background
//! timer tasks, so the sink serializes writers: one event is one line,
//! written and flushed while holding the sink lock, and two concurrent
//! emissions never interleave their bytes. Relative order across
//! different timer IDs is whatever the scheduler produces.
//!
//! Callers must not hold the registry lock while emitting; the sink
//! lock is the only lock taken here.

use crate::event::TimerEvent;
use async_trait::async_trait;
use std::sync::{Arc, Mutex as StdMutex};
use thiserror::Error;
use tokio::io::{self, AsyncWriteExt, Stdout};
use tokio::sync::Mutex;

/// Errors from writing to the output stream
#[derive(Debug, Error)]
pub enum EmitError {
    #[error("failed to write event: {0}")]
    Io(#[from] io::Error),
}

/// Destination for wire events
#[async_trait]
pub trait EventSink: Clone + Send + Sync + 'static {
    /// Write a single event as one atomic, flushed line
    async fn emit(&self, event: &TimerEvent) -> Result<(), EmitError>;
}

/// Sink writing one flushed line per event to stdout
#[derive(Clone)]
pub struct StdoutSink {
    stdout: Arc<Mutex<Stdout>>,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            stdout: Arc::new(Mutex::new(io::stdout())),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for StdoutSink {
    async fn emit(&self, event: &TimerEvent) -> Result<(), EmitError> {
        let line = format!("{event}\n");
        let mut stdout = self.stdout.lock().await;
        stdout.write_all(line.as_bytes()).await?;
        // Flush before releasing the lock so the parent sees the event
        // without buffering delay
        stdout.flush().await?;
        Ok(())
    }
}

/// In-memory sink capturing events for tests
#[derive(Clone, Default)]
pub struct MemorySink {
    events: Arc<StdMutex<Vec<TimerEvent>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order
    pub fn events(&self) -> Vec<TimerEvent> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Count of captured events with the given wire name and ID
    pub fn count(&self, name: &str, id: &str) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.name() == name && e.id() == id)
            .count()
    }
}

#[async_trait]
impl EventSink for MemorySink {
    async fn emit(&self, event: &TimerEvent) -> Result<(), EmitError> {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn memory_sink_captures_in_order() {
        let sink = MemorySink::new();
        let first = TimerEvent::IntervalFired {
            id: "a".to_string(),
        };
        let second = TimerEvent::TimeoutFired {
            id: "b".to_string(),
            elapsed: Duration::from_nanos(10),
        };

        sink.emit(&first).await.unwrap();
        sink.emit(&second).await.unwrap();

        assert_eq!(sink.events(), vec![first, second]);
    }

    #[tokio::test]
    async fn memory_sink_clones_share_storage() {
        let sink = MemorySink::new();
        let clone = sink.clone();

        clone
            .emit(&TimerEvent::IntervalFired {
                id: "a".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(sink.count("interval", "a"), 1);
        assert_eq!(sink.count("interval", "b"), 0);
    }
}
