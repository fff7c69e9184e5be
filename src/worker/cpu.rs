//! CPU-based worker for vanity key search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use crossbeam_channel::Sender;

use crate::crypto::KeyGenerator;
use crate::matcher::Pattern;

use super::{Envelope, WorkerConfig, WorkerId, WorkerMsg};

/// Terminal state of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// Sent a `Found` message.
    Found,
    /// Stopped by the coordinator, or the coordinator went away.
    Cancelled,
    /// Sent an `Error` message without searching.
    SetupFailed,
}

/// A worker that generates candidate keypairs and tests them against a prefix.
pub struct CpuWorker<G> {
    /// Worker ID
    id: WorkerId,
    /// Spawn-time parameters
    config: WorkerConfig,
    /// Candidate source, owned exclusively
    generator: G,
    /// Channel to the coordinator
    tx: Sender<Envelope>,
    /// Set by the coordinator to stop this worker
    cancel: Arc<AtomicBool>,
}

impl<G: KeyGenerator> CpuWorker<G> {
    /// Creates a new CPU worker.
    pub fn new(
        id: WorkerId,
        config: WorkerConfig,
        generator: G,
        tx: Sender<Envelope>,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            id,
            config,
            generator,
            tx,
            cancel,
        }
    }

    /// Runs the worker loop.
    ///
    /// Generates keypairs and tests them against the prefix until:
    /// - A match is found (sends `Found` and stops)
    /// - The cancel flag is set
    /// - The coordinator's receiver is gone
    pub fn run(mut self) -> WorkerOutcome {
        let prefix = match self.config.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => prefix,
            _ => {
                self.send(WorkerMsg::Error {
                    message: format!("worker {}: target prefix is not set", self.id),
                });
                return WorkerOutcome::SetupFailed;
            }
        };

        let pattern = Pattern::new(prefix, self.config.ignore_case);
        let report_every = self.config.report_every();
        let started = Instant::now();
        let mut attempts: u64 = 0;

        loop {
            if self.cancel.load(Ordering::Relaxed) {
                return WorkerOutcome::Cancelled;
            }

            let pair = self.generator.generate();
            attempts += 1;

            if pattern.matches(&pair.public_key).is_match() {
                let msg = WorkerMsg::Found {
                    attempts,
                    elapsed_ms: elapsed_ms(started),
                    public_key: pair.public_key,
                    private_key: pair.private_key,
                };
                return if self.send(msg) {
                    WorkerOutcome::Found
                } else {
                    WorkerOutcome::Cancelled
                };
            }

            if attempts % report_every == 0 {
                let msg = WorkerMsg::Progress {
                    attempts,
                    elapsed_ms: elapsed_ms(started),
                };
                if !self.send(msg) {
                    return WorkerOutcome::Cancelled;
                }
            }
        }
    }

    fn send(&self, msg: WorkerMsg) -> bool {
        self.tx
            .send(Envelope {
                worker: self.id,
                msg,
            })
            .is_ok()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
