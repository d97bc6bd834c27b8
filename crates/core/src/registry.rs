// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timeout and interval registry
//!
//! One coordinator owns both ID→record maps behind a single lock. Each
//! accepted timeout spawns a one-shot wait task; each accepted interval
//! spawns a repeat task that runs until its cancellation token is
//! signaled. Timeouts and intervals live in disjoint namespaces, so a
//! timeout and an interval may share an ID without conflict.
//!
//! The lock is never held across an await. For timeouts, removal from
//! the map decides the race between a natural fire and an explicit
//! clear: whichever side takes the record out owns the single emission,
//! and the loser observes the ID as absent and does nothing.

use crate::clock::Clock;
use crate::emitter::EventSink;
use crate::event::TimerEvent;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// A pending one-shot timeout
struct TimeoutEntry {
    started: Instant,
    handle: JoinHandle<()>,
}

/// An active repeating interval
struct IntervalEntry {
    started: Instant,
    cancel: CancellationToken,
}

#[derive(Default)]
struct Maps {
    timeouts: HashMap<String, TimeoutEntry>,
    intervals: HashMap<String, IntervalEntry>,
}

/// Registry of active timeouts and intervals
///
/// Cheap to clone; all clones share the same maps, clock and sink.
pub struct Registry<C: Clock, S: EventSink> {
    maps: Arc<Mutex<Maps>>,
    clock: C,
    sink: S,
}

impl<C: Clock, S: EventSink> Clone for Registry<C, S> {
    fn clone(&self) -> Self {
        Self {
            maps: Arc::clone(&self.maps),
            clock: self.clock.clone(),
            sink: self.sink.clone(),
        }
    }
}

impl<C: Clock, S: EventSink> Registry<C, S> {
    pub fn new(clock: C, sink: S) -> Self {
        Self {
            maps: Arc::new(Mutex::new(Maps::default())),
            clock,
            sink,
        }
    }

    /// Schedule a one-shot timeout.
    ///
    /// A duplicate ID is a no-op; the existing timeout is untouched.
    pub fn set_timeout(&self, id: &str, duration: Duration) {
        let mut maps = self.lock_maps();
        if maps.timeouts.contains_key(id) {
            debug!(id, "timeout already exists");
            return;
        }

        debug!(id, duration_ns = duration.as_nanos() as u64, "setting timeout");
        let started = self.clock.now();
        let handle = tokio::spawn(wait_and_fire(
            self.clone(),
            id.to_string(),
            started,
            duration,
        ));
        maps.timeouts.insert(id.to_string(), TimeoutEntry { started, handle });
    }

    /// Cancel a pending timeout, reporting how long it waited.
    ///
    /// Clearing an ID with no pending timeout is a silent no-op. If the
    /// timeout is already mid-fire the record is gone by the time we
    /// look, so the same no-op path applies.
    pub async fn clear_timeout(&self, id: &str) {
        let entry = self.lock_maps().timeouts.remove(id);
        let Some(entry) = entry else {
            debug!(id, "no timeout to clear");
            return;
        };

        entry.handle.abort();
        let elapsed = self.clock.now() - entry.started;
        let event = TimerEvent::TimeoutCleared {
            id: id.to_string(),
            elapsed,
        };
        if let Err(e) = self.sink.emit(&event).await {
            warn!(id, error = %e, "failed to emit clearedTimeout event");
        }
    }

    /// Start a repeating interval.
    ///
    /// A zero duration means fire as fast as scheduling allows. A
    /// duplicate ID is a no-op; the existing interval keeps running.
    pub fn set_interval(&self, id: &str, period: Duration) {
        let mut maps = self.lock_maps();
        if maps.intervals.contains_key(id) {
            debug!(id, "interval already exists");
            return;
        }

        debug!(id, period_ns = period.as_nanos() as u64, "setting interval");
        let started = self.clock.now();
        let cancel = CancellationToken::new();
        maps.intervals.insert(
            id.to_string(),
            IntervalEntry {
                started,
                cancel: cancel.clone(),
            },
        );

        if period.is_zero() {
            tokio::spawn(run_busy_interval(self.sink.clone(), id.to_string(), cancel));
        } else {
            tokio::spawn(run_interval(
                self.sink.clone(),
                id.to_string(),
                started,
                period,
                cancel,
            ));
        }
    }

    /// Stop a repeating interval.
    ///
    /// No output event is emitted. Clearing an ID with no active
    /// interval is a silent no-op. The record is removed before the
    /// token is signaled, so cancellation cannot be signaled twice.
    pub fn clear_interval(&self, id: &str) {
        let entry = self.lock_maps().intervals.remove(id);
        let Some(entry) = entry else {
            debug!(id, "no interval to clear");
            return;
        };

        entry.cancel.cancel();
        let elapsed = self.clock.now() - entry.started;
        debug!(id, elapsed_ns = elapsed.as_nanos() as u64, "interval cleared");
    }

    /// Number of pending timeouts
    pub fn pending_timeouts(&self) -> usize {
        self.lock_maps().timeouts.len()
    }

    /// Number of active intervals
    pub fn active_intervals(&self) -> usize {
        self.lock_maps().intervals.len()
    }

    fn lock_maps(&self) -> MutexGuard<'_, Maps> {
        self.maps.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// One-shot wait task for a timeout.
///
/// Removing our own record under the lock, before emitting, is what a
/// concurrent clear observes: once the record is gone the clear is a
/// no-op, and exactly one of `timeout`/`clearedTimeout` is emitted.
async fn wait_and_fire<C: Clock, S: EventSink>(
    registry: Registry<C, S>,
    id: String,
    started: Instant,
    duration: Duration,
) {
    time::sleep(duration).await;

    if registry.lock_maps().timeouts.remove(&id).is_none() {
        // Lost the race to a clear
        return;
    }

    let elapsed = registry.clock.now() - started;
    let event = TimerEvent::TimeoutFired { id, elapsed };
    if let Err(e) = registry.sink.emit(&event).await {
        warn!(id = event.id(), error = %e, "failed to emit timeout event");
    }
}

/// Repeat task for a positive-period interval.
async fn run_interval<S: EventSink>(
    sink: S,
    id: String,
    started: Instant,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = time::interval_at(started + period, period);
    // A slow consumer drops ticks instead of bursting to catch up
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!(id = %id, "interval stopped");
                return;
            }
            _ = ticker.tick() => {
                let event = TimerEvent::IntervalFired { id: id.clone() };
                if let Err(e) = sink.emit(&event).await {
                    warn!(id = %id, error = %e, "failed to emit interval event");
                    return;
                }
            }
        }
    }
}

/// Repeat task for a zero-period interval: best-effort maximum rate.
///
/// The cancellation token is polled every iteration, and the task
/// yields between emissions so command intake and other timers are not
/// starved.
async fn run_busy_interval<S: EventSink>(sink: S, id: String, cancel: CancellationToken) {
    while !cancel.is_cancelled() {
        let event = TimerEvent::IntervalFired { id: id.clone() };
        if let Err(e) = sink.emit(&event).await {
            warn!(id = %id, error = %e, "failed to emit interval event");
            return;
        }
        tokio::task::yield_now().await;
    }
    debug!(id = %id, "interval stopped");
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
