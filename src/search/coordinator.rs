//! Aggregates worker messages, picks the winner and cancels the rest.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crossbeam_channel::{never, select, tick, Receiver};

use crate::estimate::Estimate;
use crate::worker::{Envelope, WorkerHandle, WorkerId, WorkerMsg};

use super::progress::{ProgressSnapshot, StatusLine};
use super::{SearchError, SearchResult};

/// Coordinator-side view of one worker.
#[derive(Debug)]
pub struct WorkerState<H> {
    pub handle: H,
    /// Last reported cumulative attempts; never decreases.
    pub attempts: u64,
    pub cancelled: bool,
}

/// Drives one search to a single result or a single failure.
///
/// The coordinator owns the worker handles, so dropping it tears the pool down.
pub struct Coordinator<H: WorkerHandle> {
    prefix: String,
    estimate: Estimate,
    // Declared before `workers` so it is dropped first.
    inbox: Receiver<Envelope>,
    workers: BTreeMap<WorkerId, WorkerState<H>>,
    status: StatusLine,
    report_interval: Duration,
    started: Instant,
    resolved: bool,
}

impl<H: WorkerHandle> Coordinator<H> {
    /// `started` is the moment the search began, taken before the workers
    /// were spawned.
    pub fn new(
        prefix: impl Into<String>,
        estimate: Estimate,
        inbox: Receiver<Envelope>,
        handles: Vec<H>,
        status: StatusLine,
        report_interval: Duration,
        started: Instant,
    ) -> Self {
        let workers = handles
            .into_iter()
            .map(|handle| {
                let state = WorkerState {
                    handle,
                    attempts: 0,
                    cancelled: false,
                };
                (state.handle.id(), state)
            })
            .collect();

        Self {
            prefix: prefix.into(),
            estimate,
            inbox,
            workers,
            status,
            report_interval,
            started,
            resolved: false,
        }
    }

    /// Runs the event loop until a worker finds a match, a worker fails,
    /// `interrupt` fires, or every worker has gone away.
    ///
    /// Waits only on the inbox, the report timer and `interrupt`.
    pub fn run(mut self, interrupt: Option<Receiver<()>>) -> Result<SearchResult, SearchError> {
        let inbox = self.inbox.clone();
        let ticker = tick(self.report_interval);
        let interrupt = interrupt.unwrap_or_else(never);

        loop {
            select! {
                recv(inbox) -> envelope => match envelope {
                    Ok(Envelope { worker, msg }) => {
                        if let Some(outcome) = self.handle(worker, msg) {
                            return outcome;
                        }
                    }
                    Err(_) => return Err(self.abort(SearchError::WorkersExited)),
                },
                recv(ticker) -> _ => self.render_progress(),
                recv(interrupt) -> _ => return Err(self.abort(SearchError::Interrupted)),
            }
        }
    }

    /// Applies one message.
    ///
    /// Returns the outcome the first time the search resolves; every later
    /// message is discarded and yields `None`.
    pub fn handle(
        &mut self,
        from: WorkerId,
        msg: WorkerMsg,
    ) -> Option<Result<SearchResult, SearchError>> {
        if self.resolved {
            tracing::debug!(worker = %from, "discarding message after resolution");
            return None;
        }
        if !self.workers.contains_key(&from) {
            tracing::warn!(worker = %from, "message from unknown worker");
            return None;
        }

        match msg {
            WorkerMsg::Progress { attempts, .. } => {
                self.record(from, attempts);
                None
            }
            WorkerMsg::Found {
                attempts,
                elapsed_ms,
                public_key,
                private_key,
            } => {
                self.record(from, attempts);
                let total_attempts = self.total_attempts();
                self.resolve(Some(from));
                tracing::info!(
                    worker = %from,
                    worker_attempts = attempts,
                    worker_elapsed_ms = elapsed_ms,
                    total_attempts,
                    "match found"
                );

                Some(Ok(SearchResult {
                    prefix: self.prefix.clone(),
                    jobs: self.workers.len(),
                    total_attempts,
                    elapsed: self.started.elapsed(),
                    public_key,
                    private_key,
                }))
            }
            WorkerMsg::Error { message } => {
                tracing::warn!(worker = %from, %message, "worker failed");
                self.resolve(Some(from));
                Some(Err(SearchError::WorkerSetup {
                    worker: from,
                    message,
                }))
            }
        }
    }

    /// Sum of the last known counts of every worker.
    pub fn total_attempts(&self) -> u64 {
        self.workers
            .values()
            .fold(0u64, |sum, w| sum.saturating_add(w.attempts))
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(self.total_attempts(), self.started.elapsed(), &self.estimate)
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    fn record(&mut self, from: WorkerId, attempts: u64) {
        if let Some(state) = self.workers.get_mut(&from) {
            state.attempts = state.attempts.max(attempts);
        }
    }

    fn render_progress(&mut self) {
        let line = self.snapshot().to_string();
        self.status.render(&line);
    }

    /// Marks the search resolved, closes the status line and cancels every
    /// worker except `spare`.
    fn resolve(&mut self, spare: Option<WorkerId>) {
        self.resolved = true;
        self.status.finish();

        for (id, state) in self.workers.iter_mut() {
            if Some(*id) == spare || state.cancelled {
                continue;
            }
            state.handle.cancel();
            state.cancelled = true;
            tracing::debug!(worker = %id, "cancelled worker");
        }
    }

    fn abort(&mut self, err: SearchError) -> SearchError {
        tracing::warn!(error = %err, "aborting search");
        self.resolve(None);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::estimate::estimate_vanity;
    use crossbeam_channel::{bounded, unbounded, Sender};
    use std::cell::Cell;
    use std::rc::Rc;

    struct FakeWorker {
        id: WorkerId,
        cancels: Rc<Cell<u32>>,
    }

    impl WorkerHandle for FakeWorker {
        fn id(&self) -> WorkerId {
            self.id
        }

        fn cancel(&self) {
            self.cancels.set(self.cancels.get() + 1);
        }
    }

    struct Harness {
        coordinator: Coordinator<FakeWorker>,
        tx: Sender<Envelope>,
        cancels: Vec<Rc<Cell<u32>>>,
    }

    fn harness(num_workers: usize) -> Harness {
        harness_started_at(num_workers, Instant::now())
    }

    fn harness_started_at(num_workers: usize, started: Instant) -> Harness {
        let (tx, rx) = unbounded();
        let cancels: Vec<_> = (0..num_workers).map(|_| Rc::new(Cell::new(0))).collect();
        let handles = cancels
            .iter()
            .enumerate()
            .map(|(i, c)| FakeWorker {
                id: WorkerId(i + 1),
                cancels: c.clone(),
            })
            .collect();
        let coordinator = Coordinator::new(
            "abc",
            estimate_vanity("abc").unwrap(),
            rx,
            handles,
            StatusLine::sink(),
            Duration::from_millis(5),
            started,
        );
        Harness {
            coordinator,
            tx,
            cancels,
        }
    }

    fn progress(attempts: u64) -> WorkerMsg {
        WorkerMsg::Progress {
            attempts,
            elapsed_ms: 1,
        }
    }

    fn found(attempts: u64, public_key: &str) -> WorkerMsg {
        WorkerMsg::Found {
            attempts,
            elapsed_ms: 10,
            public_key: public_key.into(),
            private_key: format!("{public_key}-secret"),
        }
    }

    #[test]
    fn test_total_attempts_at_resolution() {
        let mut h = harness(3);
        assert!(h.coordinator.handle(WorkerId(1), progress(100)).is_none());
        assert!(h.coordinator.handle(WorkerId(3), progress(200)).is_none());

        let result = h
            .coordinator
            .handle(WorkerId(2), found(500, "abcKey="))
            .unwrap()
            .unwrap();

        assert_eq!(result.total_attempts, 800);
        assert_eq!(result.jobs, 3);
        assert_eq!(result.prefix, "abc");
        assert_eq!(result.public_key, "abcKey=");
        assert_eq!(result.private_key, "abcKey=-secret");
        assert_eq!(cancel_counts(&h.cancels), vec![1, 0, 1]);
    }

    #[test]
    fn test_late_messages_are_discarded() {
        let mut h = harness(3);
        h.coordinator.handle(WorkerId(1), progress(100));
        let first = h
            .coordinator
            .handle(WorkerId(2), found(500, "abcWin="))
            .unwrap()
            .unwrap();

        assert!(h.coordinator.handle(WorkerId(1), found(900, "abcLate=")).is_none());
        assert!(h.coordinator.handle(WorkerId(3), progress(10_000)).is_none());
        assert!(h
            .coordinator
            .handle(WorkerId(3), WorkerMsg::Error { message: "late".into() })
            .is_none());

        assert!(h.coordinator.is_resolved());
        assert_eq!(h.coordinator.total_attempts(), 600);
        assert_eq!(first.total_attempts, 600);
        assert_eq!(first.public_key, "abcWin=");
        assert_eq!(cancel_counts(&h.cancels), vec![1, 0, 1]);
    }

    #[test]
    fn test_error_fails_search_and_cancels_others_once() {
        let mut h = harness(3);
        h.coordinator.handle(WorkerId(2), progress(40));

        let err = h
            .coordinator
            .handle(WorkerId(1), WorkerMsg::Error { message: "x".into() })
            .unwrap()
            .unwrap_err();

        assert_eq!(err.to_string(), "x");
        assert!(matches!(err, SearchError::WorkerSetup { worker: WorkerId(1), .. }));
        assert_eq!(cancel_counts(&h.cancels), vec![0, 1, 1]);

        // A second failure after resolution changes nothing.
        assert!(h
            .coordinator
            .handle(WorkerId(3), WorkerMsg::Error { message: "y".into() })
            .is_none());
        assert_eq!(cancel_counts(&h.cancels), vec![0, 1, 1]);
    }

    #[test]
    fn test_elapsed_counts_from_search_start() {
        let lead = Duration::from_millis(250);
        let started = Instant::now() - lead;
        let mut h = harness_started_at(2, started);

        let result = h
            .coordinator
            .handle(WorkerId(1), found(3, "abc="))
            .unwrap()
            .unwrap();
        assert!(result.elapsed >= lead);
        assert!(h.coordinator.snapshot().elapsed >= result.elapsed);
    }

    #[test]
    fn test_attempts_never_decrease() {
        let mut h = harness(2);
        h.coordinator.handle(WorkerId(1), progress(300));
        h.coordinator.handle(WorkerId(1), progress(200));
        assert_eq!(h.coordinator.total_attempts(), 300);

        let result = h
            .coordinator
            .handle(WorkerId(1), found(250, "abc="))
            .unwrap()
            .unwrap();
        assert_eq!(result.total_attempts, 300);
    }

    #[test]
    fn test_unknown_worker_is_ignored() {
        let mut h = harness(2);
        assert!(h.coordinator.handle(WorkerId(42), found(1, "abc=")).is_none());
        assert!(!h.coordinator.is_resolved());
        assert_eq!(h.coordinator.total_attempts(), 0);
    }

    #[test]
    fn test_snapshot_sums_workers() {
        let mut h = harness(2);
        h.coordinator.handle(WorkerId(1), progress(10));
        h.coordinator.handle(WorkerId(2), progress(15));
        let snap = h.coordinator.snapshot();
        assert_eq!(snap.attempts, 25);
        assert_eq!(snap.expected_attempts, 262_144);
    }

    #[test]
    fn test_run_resolves_first_found() {
        let h = harness(3);
        h.tx.send(Envelope {
            worker: WorkerId(3),
            msg: progress(200),
        })
        .unwrap();
        h.tx.send(Envelope {
            worker: WorkerId(2),
            msg: found(500, "abcA="),
        })
        .unwrap();
        h.tx.send(Envelope {
            worker: WorkerId(1),
            msg: found(700, "abcB="),
        })
        .unwrap();

        let result = h.coordinator.run(None).unwrap();
        assert_eq!(result.public_key, "abcA=");
        assert_eq!(result.total_attempts, 700);
        assert_eq!(cancel_counts(&h.cancels), vec![1, 0, 1]);
    }

    #[test]
    fn test_run_reports_error() {
        let h = harness(2);
        h.tx.send(Envelope {
            worker: WorkerId(2),
            msg: WorkerMsg::Error {
                message: "prefix missing".into(),
            },
        })
        .unwrap();

        let err = h.coordinator.run(None).unwrap_err();
        assert_eq!(err.to_string(), "prefix missing");
        assert_eq!(cancel_counts(&h.cancels), vec![1, 0]);
    }

    #[test]
    fn test_run_detects_all_workers_gone() {
        let h = harness(2);
        drop(h.tx);

        let err = h.coordinator.run(None).unwrap_err();
        assert!(matches!(err, SearchError::WorkersExited));
        assert_eq!(cancel_counts(&h.cancels), vec![1, 1]);
    }

    #[test]
    fn test_run_interrupted() {
        let h = harness(2);
        let (stop_tx, stop_rx) = bounded(1);
        stop_tx.send(()).unwrap();

        let err = h.coordinator.run(Some(stop_rx)).unwrap_err();
        assert!(matches!(err, SearchError::Interrupted));
        assert_eq!(cancel_counts(&h.cancels), vec![1, 1]);
        drop(h.tx);
    }

    fn cancel_counts(cancels: &[Rc<Cell<u32>>]) -> Vec<u32> {
        cancels.iter().map(|c| c.get()).collect()
    }
}
