// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command parsing for the input line protocol
//!
//! One command per line, whitespace-separated tokens: the command name,
//! a caller-chosen opaque ID, and (for the set commands) a duration
//! token. Extra trailing tokens are ignored.

use crate::duration::{parse_duration, DurationError};
use std::time::Duration;
use thiserror::Error;

/// A parsed input command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Schedule a one-shot fire after `duration`
    SetTimeout { id: String, duration: Duration },
    /// Cancel a pending timeout
    ClearTimeout { id: String },
    /// Schedule a repeating fire every `duration` (zero = max rate)
    SetInterval { id: String, duration: Duration },
    /// Cancel a repeating interval
    ClearInterval { id: String },
}

/// Errors from parsing a command line
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// The line held fewer than a command name and an ID
    #[error("expected a command and an id: {0:?}")]
    TooFewTokens(String),

    /// Token 0 is not one of the four known commands
    #[error("unknown command: {0:?}")]
    UnknownCommand(String),

    /// A set command was missing its duration argument
    #[error("{0} requires a duration argument")]
    MissingDuration(&'static str),

    /// The duration token did not parse
    #[error("invalid duration: {0}")]
    InvalidDuration(#[from] DurationError),
}

impl Command {
    /// Parse one line of the input protocol
    pub fn parse(line: &str) -> Result<Command, CommandError> {
        let mut fields = line.split_whitespace();
        let (Some(name), Some(id)) = (fields.next(), fields.next()) else {
            return Err(CommandError::TooFewTokens(line.to_string()));
        };
        let id = id.to_string();

        match name {
            "setTimeout" => Ok(Command::SetTimeout {
                id,
                duration: require_duration("setTimeout", fields.next())?,
            }),
            "clearTimeout" => Ok(Command::ClearTimeout { id }),
            "setInterval" => Ok(Command::SetInterval {
                id,
                duration: require_duration("setInterval", fields.next())?,
            }),
            "clearInterval" => Ok(Command::ClearInterval { id }),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    /// The timer ID this command refers to
    pub fn id(&self) -> &str {
        match self {
            Command::SetTimeout { id, .. }
            | Command::ClearTimeout { id }
            | Command::SetInterval { id, .. }
            | Command::ClearInterval { id } => id,
        }
    }
}

fn require_duration(
    command: &'static str,
    token: Option<&str>,
) -> Result<Duration, CommandError> {
    let token = token.ok_or(CommandError::MissingDuration(command))?;
    Ok(parse_duration(token)?)
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
