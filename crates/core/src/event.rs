// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire events emitted on the output stream
//!
//! One event per line. Timeout events carry the elapsed wait in whole
//! nanoseconds; interval fires carry only the ID. Clearing an interval
//! emits nothing at all, so there is no variant for it.

use std::fmt;
use std::time::Duration;

/// An event to be written to the output stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerEvent {
    /// A timeout reached its deadline
    TimeoutFired { id: String, elapsed: Duration },
    /// A pending timeout was cleared before firing
    TimeoutCleared { id: String, elapsed: Duration },
    /// One tick of an active interval
    IntervalFired { id: String },
}

impl TimerEvent {
    /// Wire name of the event, also used in diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::TimeoutFired { .. } => "timeout",
            TimerEvent::TimeoutCleared { .. } => "clearedTimeout",
            TimerEvent::IntervalFired { .. } => "interval",
        }
    }

    /// The timer ID this event refers to
    pub fn id(&self) -> &str {
        match self {
            TimerEvent::TimeoutFired { id, .. }
            | TimerEvent::TimeoutCleared { id, .. }
            | TimerEvent::IntervalFired { id } => id,
        }
    }
}

impl fmt::Display for TimerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerEvent::TimeoutFired { id, elapsed } | TimerEvent::TimeoutCleared { id, elapsed } => {
                write!(f, "{} {} {}", self.name(), id, elapsed.as_nanos())
            }
            TimerEvent::IntervalFired { id } => write!(f, "{} {}", self.name(), id),
        }
    }
}
