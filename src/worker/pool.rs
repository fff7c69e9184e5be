//! Worker pool management.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver};

use crate::crypto::KeyGenerator;

use super::cpu::CpuWorker;
use super::{Envelope, WorkerConfig, WorkerId};

/// Coordinator-side handle to a running worker.
pub trait WorkerHandle {
    fn id(&self) -> WorkerId;

    /// Asks the worker to stop. Must not block.
    fn cancel(&self);
}

/// A worker running on its own OS thread.
///
/// Dropping the handle cancels the worker and joins its thread.
pub struct ThreadWorker {
    id: WorkerId,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl WorkerHandle for ThreadWorker {
    fn id(&self) -> WorkerId {
        self.id
    }

    fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

impl Drop for ThreadWorker {
    fn drop(&mut self) {
        self.cancel();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!(worker = %self.id, "worker thread panicked");
            }
        }
    }
}

/// A set of search workers sharing one message channel.
pub struct WorkerPool {
    /// Channel receiver for worker messages
    inbox: Receiver<Envelope>,
    /// Running workers
    workers: Vec<ThreadWorker>,
}

impl WorkerPool {
    /// Spawns `num_workers` threads, each with its own copy of `config` and a
    /// generator from `make_generator`.
    ///
    /// If a thread fails to spawn, the workers already started are torn down.
    pub fn spawn<G, F>(num_workers: usize, config: &WorkerConfig, make_generator: F) -> io::Result<Self>
    where
        G: KeyGenerator + Send + 'static,
        F: Fn() -> G,
    {
        let (tx, inbox) = unbounded();
        let mut workers = Vec::with_capacity(num_workers);

        for index in 0..num_workers {
            let id = WorkerId(index);
            let cancel = Arc::new(AtomicBool::new(false));
            let worker = CpuWorker::new(id, config.clone(), make_generator(), tx.clone(), cancel.clone());

            let handle = thread::Builder::new()
                .name(format!("vanity-worker-{}", index))
                .spawn(move || {
                    let outcome = worker.run();
                    tracing::debug!(worker = %id, ?outcome, "worker stopped");
                })?;

            workers.push(ThreadWorker {
                id,
                cancel,
                handle: Some(handle),
            });
        }

        tracing::info!(workers = num_workers, "spawned search workers");

        Ok(Self { inbox, workers })
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.workers.len()
    }

    /// Splits the pool into its message receiver and worker handles.
    pub fn into_parts(self) -> (Receiver<Envelope>, Vec<ThreadWorker>) {
        (self.inbox, self.workers)
    }
}
