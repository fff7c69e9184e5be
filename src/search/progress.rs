//! Aggregate progress and the live status line.

use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::time::Duration;

use crate::estimate::{Estimate, TimeEstimate};
use crate::format::format_seconds;

/// An approximate, point-in-time view of the whole pool.
///
/// Worker counters arrive asynchronously, so `attempts` lags the work
/// actually done.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub attempts: u64,
    pub elapsed: Duration,
    pub attempts_per_second: f64,
    pub expected_attempts: u128,
    /// `None` until some throughput has been measured.
    pub eta: Option<TimeEstimate>,
}

impl ProgressSnapshot {
    pub fn new(attempts: u64, elapsed: Duration, estimate: &Estimate) -> Self {
        let secs = elapsed.as_secs_f64();
        let attempts_per_second = if secs > 0.0 {
            attempts as f64 / secs
        } else {
            0.0
        };
        let eta = (attempts_per_second > 0.0).then(|| estimate.time_at(attempts_per_second));

        Self {
            attempts,
            elapsed,
            attempts_per_second,
            expected_attempts: estimate.expected_attempts,
            eta,
        }
    }
}

impl fmt::Display for ProgressSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Progress: attempts {}, rate {:.1} aps, expected {} attempts, ETA ",
            self.attempts, self.attempts_per_second, self.expected_attempts
        )?;
        match self.eta {
            Some(eta) => write!(f, "~{}", format_seconds(eta.expected_seconds)),
            None => write!(f, "N/A"),
        }
    }
}

/// A single evolving status line.
///
/// Interactive output rewrites the line in place; otherwise each update is
/// appended as its own line.
pub struct StatusLine {
    out: Box<dyn Write + Send>,
    interactive: bool,
    /// An in-place line is on screen without its trailing newline
    open: bool,
}

impl StatusLine {
    pub fn new(out: Box<dyn Write + Send>, interactive: bool) -> Self {
        Self {
            out,
            interactive,
            open: false,
        }
    }

    /// Status line on stderr, interactive when stderr is a terminal.
    pub fn stderr() -> Self {
        let interactive = io::stderr().is_terminal();
        Self::new(Box::new(io::stderr()), interactive)
    }

    /// A status line that discards everything.
    pub fn sink() -> Self {
        Self::new(Box::new(io::sink()), false)
    }

    pub fn render(&mut self, line: &str) {
        let result = if self.interactive {
            self.open = true;
            write!(self.out, "\r\x1b[2K{}", line)
        } else {
            writeln!(self.out, "{}", line)
        };
        if let Err(e) = result.and_then(|_| self.out.flush()) {
            tracing::debug!(error = %e, "failed to write status line");
        }
    }

    /// Ends an in-place line. Safe to call more than once.
    pub fn finish(&mut self) {
        if self.open {
            self.open = false;
            if let Err(e) = writeln!(self.out).and_then(|_| self.out.flush()) {
                tracing::debug!(error = %e, "failed to finish status line");
            }
        }
    }
}
