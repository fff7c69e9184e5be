//! Parallel vanity key search.
//!
//! [`run_search`] validates a [`SearchRequest`], spawns the worker pool and
//! hands it to a [`Coordinator`], which resolves exactly one
//! [`SearchResult`] or one [`SearchError`].
//!
//! When two workers find a match at nearly the same moment, whichever
//! `Found` message the coordinator receives first wins.

mod coordinator;
mod progress;

use std::io;
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;

use crate::config::Settings;
use crate::crypto::{X25519Generator, MAX_PREFIX_LEN};
use crate::estimate::{estimate_vanity, Estimate, ValidationError};
use crate::host::HostInfo;
use crate::worker::{WorkerConfig, WorkerId, WorkerPool};

pub use coordinator::{Coordinator, WorkerState};
pub use progress::{ProgressSnapshot, StatusLine};

/// Errors that end a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A worker could not start searching.
    #[error("{message}")]
    WorkerSetup { worker: WorkerId, message: String },

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),

    #[error("search interrupted")]
    Interrupted,

    #[error("all workers exited without a result")]
    WorkersExited,
}

impl SearchError {
    /// Process exit code: 2 when a worker could not start, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        match self {
            SearchError::WorkerSetup { .. } => 2,
            _ => 1,
        }
    }
}

/// Parameters of one search. Immutable once the search starts.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    prefix: String,
    ignore_case: bool,
    jobs: Option<usize>,
    report_every: u64,
    report_interval: Duration,
}

impl SearchRequest {
    /// Creates a case-sensitive request with default cadence and worker count.
    pub fn new(prefix: impl Into<String>) -> Self {
        let settings = Settings::default();
        Self {
            prefix: prefix.into(),
            ignore_case: false,
            jobs: None,
            report_every: settings.report_every_attempts,
            report_interval: settings.report_interval,
        }
    }

    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Sets the worker count; `None` or zero means one per spare CPU thread.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs.filter(|&n| n > 0);
        self
    }

    pub fn report_every(mut self, attempts: u64) -> Self {
        self.report_every = attempts;
        self
    }

    pub fn report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    /// Checks the prefix and returns its difficulty estimate.
    pub fn validate(&self) -> Result<Estimate, ValidationError> {
        if self.prefix.is_empty() {
            return Err(ValidationError::EmptyPrefix);
        }
        let estimate = estimate_vanity(&self.prefix)?;
        if estimate.prefix_len > MAX_PREFIX_LEN {
            return Err(ValidationError::PrefixTooLong {
                len: estimate.prefix_len,
                max: MAX_PREFIX_LEN,
            });
        }
        Ok(estimate)
    }

    /// Explicit worker count, else one less than the host's threads (at least 1).
    pub fn resolve_jobs(&self, host: &HostInfo) -> usize {
        self.jobs.unwrap_or_else(|| host.default_jobs())
    }

    fn worker_config(&self) -> WorkerConfig {
        WorkerConfig::new(self.prefix.clone(), self.report_every, self.ignore_case)
    }
}

/// The outcome of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub prefix: String,
    pub jobs: usize,
    /// Sum of every worker's last known count when the winner reported.
    pub total_attempts: u64,
    pub elapsed: Duration,
    pub public_key: String,
    pub private_key: String,
}

/// Searches for a keypair whose public key starts with the requested prefix.
///
/// Validation happens before any worker is spawned. The worker pool is torn
/// down before this returns, whatever the outcome. `interrupt` aborts the
/// search with [`SearchError::Interrupted`].
pub fn run_search(
    request: &SearchRequest,
    host: &HostInfo,
    status: StatusLine,
    interrupt: Option<Receiver<()>>,
) -> Result<SearchResult, SearchError> {
    let estimate = request.validate()?;
    let jobs = request.resolve_jobs(host);

    tracing::info!(
        prefix = %request.prefix,
        jobs,
        ignore_case = request.ignore_case,
        expected_attempts = %estimate.expected_attempts,
        "starting search"
    );

    let started = Instant::now();
    let pool = WorkerPool::spawn(jobs, &request.worker_config(), || X25519Generator)?;
    let (inbox, workers) = pool.into_parts();

    Coordinator::new(
        request.prefix.clone(),
        estimate,
        inbox,
        workers,
        status,
        request.report_interval,
        started,
    )
    .run(interrupt)
}
