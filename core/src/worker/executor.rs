//! Worker execution loop

use crate::cancel::{CancelReason, RunContext};
use crate::config::FailurePolicy;
use crate::counter::{Outcome, ResultCounter};
use crate::error::{Error, Result};
use crate::queue::WorkQueue;
use crate::source::WorkItem;
use crate::transport::HttpTransport;

use super::stats::WorkerStats;

use std::sync::Arc;

/// Worker executes requests in a loop: take -> request -> count -> mark done
///
/// Workers are tokio tasks managed by the [`WorkerPool`](super::WorkerPool).
/// They share the queue, the transport and the result counter via `Arc`, and
/// never talk to each other directly.
pub struct Worker {
    /// Unique worker identifier
    id: usize,

    /// Transport (shared across workers)
    transport: Arc<dyn HttpTransport>,

    /// Source of work items
    queue: Arc<WorkQueue<WorkItem>>,

    /// Run-wide tallies
    counter: Arc<ResultCounter>,

    /// Run-wide cancellation
    context: RunContext,

    /// What to do when a request gets no response
    failure_policy: FailurePolicy,
}

impl Worker {
    /// Create a new worker
    pub fn new(
        id: usize,
        transport: Arc<dyn HttpTransport>,
        queue: Arc<WorkQueue<WorkItem>>,
        counter: Arc<ResultCounter>,
        context: RunContext,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            id,
            transport,
            queue,
            counter,
            context,
            failure_policy,
        }
    }

    /// Run the worker loop
    ///
    /// Returns when the queue is closed and empty, when the run is cancelled,
    /// or right after this worker cancels the run under
    /// [`FailurePolicy::Abort`].
    pub async fn run(self) -> Result<WorkerStats> {
        let mut stats = WorkerStats::new();
        stats.start();

        tracing::debug!(worker_id = self.id, "Worker started");

        loop {
            let item = tokio::select! {
                biased;

                // Cancellation has priority over queued work
                reason = self.context.cancelled() => {
                    tracing::debug!(worker_id = self.id, ?reason, "Worker observed cancellation");
                    break;
                }

                item = self.queue.get() => item,
            };

            let Some(item) = item else {
                tracing::debug!(worker_id = self.id, "Queue closed, worker stopping");
                break;
            };

            let (outcome, abort) = self.execute_one(&item).await;
            stats.record(outcome);

            // Done regardless of outcome; an abort is already published.
            self.queue.mark_done().map_err(|e| {
                Error::worker(format!("worker {} failed to mark item done: {e}", self.id))
            })?;

            if abort {
                break;
            }
        }

        stats.stop();
        tracing::debug!(
            worker_id = self.id,
            processed = stats.processed,
            failures = stats.failures(),
            elapsed_ms = ?stats.elapsed().map(|d| d.as_millis()),
            "Worker finished"
        );

        Ok(stats)
    }

    /// Perform one request and record its outcome
    ///
    /// Returns the outcome and whether this worker cancelled the run.
    async fn execute_one(&self, item: &WorkItem) -> (Outcome, bool) {
        let target = item.target();

        match self.transport.get(target).await {
            Ok(response) => {
                let outcome = Outcome::from_status(response.status);
                tracing::debug!(
                    worker_id = self.id,
                    addr = %target,
                    status = response.status,
                    headers = ?response.headers,
                    "Response received"
                );
                self.counter.record(outcome);
                (outcome, false)
            }
            Err(e) => {
                self.counter.record(Outcome::TransportFailure);
                match self.failure_policy {
                    FailurePolicy::Continue => {
                        tracing::warn!(
                            worker_id = self.id,
                            addr = %target,
                            error = %e,
                            "Request failed"
                        );
                        (Outcome::TransportFailure, false)
                    }
                    FailurePolicy::Abort => {
                        tracing::error!(
                            worker_id = self.id,
                            addr = %target,
                            error = %e,
                            "Request failed, aborting run"
                        );
                        self.context.cancel(CancelReason::TransportFailure {
                            target: target.to_string(),
                            message: e.to_string(),
                        });
                        (Outcome::TransportFailure, true)
                    }
                }
            }
        }
    }

    /// Get the worker ID
    pub fn id(&self) -> usize {
        self.id
    }
}

impl std::fmt::Debug for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Worker")
            .field("id", &self.id)
            .field("transport", &self.transport.name())
            .field("queue", &self.queue)
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}
