//! Worker pool for parallel vanity key search.
//!
//! This module provides:
//! - The worker → coordinator message protocol
//! - The CPU search loop run by every worker
//! - A pool of isolated worker threads with per-worker cancellation

mod cpu;
mod pool;

use std::fmt;

pub use cpu::{CpuWorker, WorkerOutcome};
pub use pool::{ThreadWorker, WorkerHandle, WorkerPool};

/// Attempts between progress messages when a worker is given no usable cadence.
pub const DEFAULT_REPORT_EVERY: u64 = 100_000;

/// Identity of a worker within one search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A message emitted by a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMsg {
    /// Periodic report of cumulative attempts.
    Progress { attempts: u64, elapsed_ms: u64 },
    /// A matching keypair; the worker stops after sending it.
    Found {
        attempts: u64,
        elapsed_ms: u64,
        public_key: String,
        private_key: String,
    },
    /// Fatal setup failure; the worker never entered its search loop.
    Error { message: String },
}

/// A message tagged with the worker that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub worker: WorkerId,
    pub msg: WorkerMsg,
}

/// Parameters handed to a worker at spawn time.
///
/// Every worker receives its own copy.
#[derive(Debug, Clone, Default)]
pub struct WorkerConfig {
    /// Target prefix; a worker without one fails setup.
    pub prefix: Option<String>,
    /// Attempts between progress messages; missing or zero means [`DEFAULT_REPORT_EVERY`].
    pub report_every: Option<u64>,
    pub ignore_case: bool,
}

impl WorkerConfig {
    pub fn new(prefix: impl Into<String>, report_every: u64, ignore_case: bool) -> Self {
        Self {
            prefix: Some(prefix.into()),
            report_every: Some(report_every),
            ignore_case,
        }
    }

    /// Returns the effective report cadence.
    pub fn report_every(&self) -> u64 {
        match self.report_every {
            Some(n) if n > 0 => n,
            _ => DEFAULT_REPORT_EVERY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_every_fallback() {
        let mut config = WorkerConfig::new("ab", 0, false);
        assert_eq!(config.report_every(), DEFAULT_REPORT_EVERY);

        config.report_every = None;
        assert_eq!(config.report_every(), DEFAULT_REPORT_EVERY);

        config.report_every = Some(250);
        assert_eq!(config.report_every(), 250);
    }

    #[test]
    fn test_worker_id_display() {
        assert_eq!(WorkerId(3).to_string(), "#3");
    }
}
