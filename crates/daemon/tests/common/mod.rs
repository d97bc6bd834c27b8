// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness that drives a spawned tempod over real pipes.
//!
//! Output lines are pumped from the child's stdout into a channel by a
//! background thread, so tests can wait for events with a timeout
//! instead of blocking on the pipe.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

pub struct Timerd {
    child: Child,
    stdin: Option<ChildStdin>,
    lines: Receiver<String>,
}

impl Timerd {
    /// Spawn the tempod binary with piped stdio.
    pub fn spawn() -> Self {
        let mut child = Command::new(env!("CARGO_BIN_EXE_tempod"))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("failed to spawn tempod");

        let stdout = child.stdout.take().expect("no stdout pipe");
        let stdin = child.stdin.take().expect("no stdin pipe");

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Self {
            child,
            stdin: Some(stdin),
            lines: rx,
        }
    }

    /// Send one command line.
    pub fn send(&mut self, command: &str) {
        let stdin = self.stdin.as_mut().expect("stdin already closed");
        writeln!(stdin, "{command}").expect("failed to write command");
        stdin.flush().expect("failed to flush command");
    }

    /// Next output line, waiting up to `timeout`.
    pub fn next_line(&self, timeout: Duration) -> Option<String> {
        self.lines.recv_timeout(timeout).ok()
    }

    /// Collect every output line that arrives within `window`.
    pub fn drain_for(&self, window: Duration) -> Vec<String> {
        let deadline = Instant::now() + window;
        let mut lines = Vec::new();
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match self.lines.recv_timeout(deadline - now) {
                Ok(line) => lines.push(line),
                Err(_) => break,
            }
        }
        lines
    }

    /// Close stdin and wait for the process to exit.
    pub fn shutdown(mut self) -> ExitStatus {
        drop(self.stdin.take());
        self.child.wait().expect("failed to wait for tempod")
    }
}

impl Drop for Timerd {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Split an event line into its whitespace-separated fields.
pub fn fields(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parse the elapsed-nanoseconds field of a timeout event line.
pub fn elapsed_nanos(line: &str) -> u128 {
    fields(line)
        .get(2)
        .and_then(|f| f.parse().ok())
        .unwrap_or_else(|| panic!("no elapsed field in line: {line:?}"))
}
