// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Duration token parsing for the command protocol
//!
//! A duration token is a base-10 signed integer followed by a single
//! unit character: `s` (seconds), `m` (milliseconds), `u` (microseconds)
//! or `n` (nanoseconds). `500m` is half a second; `10n` is ten
//! nanoseconds.

use std::time::Duration;
use thiserror::Error;

/// Errors from parsing a duration token
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DurationError {
    /// Token too short to hold both a value and a unit
    #[error("duration too short: {0:?}")]
    TooShort(String),

    /// The value prefix is not a base-10 integer
    #[error("invalid duration value: {0:?}")]
    BadValue(String),

    /// The trailing unit character is not one of s/m/u/n
    #[error("invalid duration unit: {0:?}")]
    BadUnit(char),
}

/// Parse a duration token like `500m` or `2s`.
///
/// The value prefix is validated before the unit, so `5x` reports a bad
/// unit while `x5s`-style garbage reports a bad value. Negative values
/// saturate to zero: a wait cannot be negative, and a zero interval
/// already means "fire as fast as possible". Values past the
/// representable nanosecond range saturate instead of wrapping.
pub fn parse_duration(token: &str) -> Result<Duration, DurationError> {
    if token.len() < 2 {
        return Err(DurationError::TooShort(token.to_string()));
    }

    let Some(unit) = token.chars().last() else {
        return Err(DurationError::TooShort(token.to_string()));
    };
    let value_str = &token[..token.len() - unit.len_utf8()];

    let value: i64 = value_str
        .parse()
        .map_err(|_| DurationError::BadValue(value_str.to_string()))?;
    let magnitude = u64::try_from(value).unwrap_or(0);

    let scale: u64 = match unit {
        's' => 1_000_000_000,
        'm' => 1_000_000,
        'u' => 1_000,
        'n' => 1,
        other => return Err(DurationError::BadUnit(other)),
    };

    Ok(Duration::from_nanos(magnitude.saturating_mul(scale)))
}

#[cfg(test)]
#[path = "duration_tests.rs"]
mod tests;
