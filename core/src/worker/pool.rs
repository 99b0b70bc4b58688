//! Fixed-size pool of worker tasks

use std::sync::Arc;

use futures::future::join_all;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::queue::WorkQueue;
use crate::source::WorkItem;

use super::builder::WorkerBuilder;
use super::stats::WorkerStats;

/// A running set of identical workers draining one queue
///
/// The pool has an explicit lifecycle: [`start`](Self::start) spawns every
/// worker, then exactly one of [`shutdown`](Self::shutdown) (close the queue,
/// let workers finish, collect their stats) or [`abort`](Self::abort) (drop
/// in-flight requests) ends it. Dropping a pool aborts whatever is still
/// running.
pub struct WorkerPool {
    queue: Arc<WorkQueue<WorkItem>>,
    handles: Vec<JoinHandle<Result<WorkerStats>>>,
}

impl WorkerPool {
    /// Spawn `size` workers built from `template`
    ///
    /// Every worker is built before any is spawned, so a builder error leaves
    /// nothing running.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `size` is zero, or the builder's
    /// error if a required part is missing.
    pub fn start(
        size: usize,
        queue: Arc<WorkQueue<WorkItem>>,
        template: WorkerBuilder,
    ) -> Result<Self> {
        if size == 0 {
            return Err(Error::config("worker pool size must be at least 1"));
        }

        let workers = (0..size)
            .map(|id| {
                template
                    .clone()
                    .id(id)
                    .queue(Arc::clone(&queue))
                    .build()
            })
            .collect::<Result<Vec<_>>>()?;

        let handles = workers
            .into_iter()
            .map(|worker| {
                tracing::trace!(worker_id = worker.id(), "Spawning worker");
                tokio::spawn(worker.run())
            })
            .collect();

        tracing::debug!(workers = size, capacity = queue.capacity(), "Worker pool started");

        Ok(Self { queue, handles })
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Close the queue and wait for every worker to exit
    ///
    /// Workers finish the items already buffered. Workers that failed or
    /// panicked are logged and left out of the result.
    pub async fn shutdown(mut self) -> Vec<WorkerStats> {
        self.queue.close();

        let handles = std::mem::take(&mut self.handles);
        let mut results = Vec::with_capacity(handles.len());
        for (idx, joined) in join_all(handles).await.into_iter().enumerate() {
            match joined {
                Ok(Ok(stats)) => {
                    tracing::debug!(
                        worker_id = idx,
                        processed = stats.processed,
                        failures = stats.failures(),
                        "Worker completed"
                    );
                    results.push(stats);
                }
                Ok(Err(e)) => {
                    tracing::error!(worker_id = idx, error = %e, "Worker returned error");
                }
                Err(e) => {
                    tracing::error!(worker_id = idx, error = %e, "Worker task panicked");
                }
            }
        }

        results
    }

    /// Abort every worker immediately, abandoning in-flight requests
    pub fn abort(mut self) {
        self.abort_all();
    }

    fn abort_all(&mut self) {
        self.queue.close();
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.abort_all();
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("size", &self.handles.len())
            .field("queue", &self.queue)
            .finish()
    }
}
