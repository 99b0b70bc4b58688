//! Orchestrator execution logic

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::cancel::{CancelReason, RunContext};
use crate::config::RunConfig;
use crate::counter::ResultCounter;
use crate::error::Result;
use crate::queue::WorkQueue;
use crate::source::{Target, WorkItem, WorkSource};
use crate::transport::HttpTransport;
use crate::worker::{WorkerBuilder, WorkerPool};

use super::aggregator::{aggregate_worker_stats, RunStats};

/// Orchestrator manages the run lifecycle
///
/// Responsible for starting the worker pool, submitting work, waiting for the
/// queue to drain and turning cancellation into an error.
pub struct Orchestrator {
    /// Run configuration
    pub(crate) config: RunConfig,

    /// Parsed target
    pub(crate) target: Target,

    /// Transport (shared across workers)
    pub(crate) transport: Arc<dyn HttpTransport>,

    /// Cancellation for the next or current run
    pub(crate) context: Mutex<RunContext>,
}

impl Orchestrator {
    /// Create a new orchestrator
    ///
    /// Use `OrchestratorBuilder` for a validated construction.
    pub fn new(config: RunConfig, target: Target, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            config,
            target,
            transport,
            context: Mutex::new(RunContext::new()),
        }
    }

    /// Handle that can cancel or observe the current run
    ///
    /// A handle taken between runs applies to the next run. Every run ends by
    /// installing a fresh context, so a cancelled run never leaks into the
    /// following one.
    pub fn cancel_handle(&self) -> RunContext {
        self.context
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cancel the current run
    pub fn cancel(&self, reason: CancelReason) {
        self.cancel_handle().cancel(reason);
    }

    /// Get the run configuration
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run once
    ///
    /// Starts the pool, submits every item, waits for the queue to drain and
    /// returns the summary. If the run is cancelled first, in-flight requests
    /// are abandoned and the cancellation reason is returned as the error.
    pub async fn run(&self) -> Result<RunStats> {
        let context = self.cancel_handle();
        let result = self.execute(&context).await;
        *self.context.lock().unwrap_or_else(PoisonError::into_inner) = RunContext::new();
        result
    }

    async fn execute(&self, context: &RunContext) -> Result<RunStats> {
        let queue = Arc::new(WorkQueue::new(self.config.queue_capacity())?);
        let counter = Arc::new(ResultCounter::new());

        tracing::info!(
            addr = %self.target,
            total_requests = self.config.total_requests,
            concurrency = self.config.concurrency,
            queue_capacity = queue.capacity(),
            failure_policy = ?self.config.failure_policy,
            transport = self.transport.name(),
            "Starting run"
        );

        let template = WorkerBuilder::new(0)
            .transport(Arc::clone(&self.transport))
            .counter(Arc::clone(&counter))
            .context(context.clone())
            .failure_policy(self.config.failure_policy);
        let pool = WorkerPool::start(self.config.concurrency, Arc::clone(&queue), template)?;

        let started_at = chrono::Utc::now();
        let start = Instant::now();
        let source = WorkSource::new(self.target.clone(), self.config.total_requests);

        let cancelled = tokio::select! {
            biased;

            reason = context.cancelled() => Some(reason),

            result = submit_and_drain(&queue, source) => {
                result?;
                context.reason()
            }
        };

        if let Some(reason) = cancelled {
            let counts = counter.snapshot();
            tracing::warn!(
                ?reason,
                workers = pool.size(),
                processed = counts.processed(),
                outstanding = queue.outstanding(),
                "Run cancelled, abandoning in-flight requests"
            );
            pool.abort();
            return Err(reason.into());
        }

        let elapsed = start.elapsed();
        let worker_stats = pool.shutdown().await;
        let spread = aggregate_worker_stats(&worker_stats);
        tracing::debug!(
            workers = spread.total_workers,
            processed = spread.processed,
            transport_errors = spread.transport_errors,
            min_per_worker = spread.min_processed,
            max_per_worker = spread.max_processed,
            "Worker pool drained"
        );

        let stats = RunStats::new(
            self.target.to_string(),
            self.config.total_requests,
            self.config.concurrency,
            counter.snapshot(),
            elapsed,
            started_at,
        );
        tracing::info!(
            elapsed_secs = stats.elapsed_secs,
            successes = stats.successes,
            failures = stats.failures,
            transport_errors = stats.transport_errors,
            rps = stats.requests_per_second,
            success_rate = stats.success_rate(),
            "Run completed"
        );

        Ok(stats)
    }

    /// Run with Ctrl+C signal handling
    ///
    /// Ctrl+C cancels the run with [`CancelReason::Interrupted`].
    pub async fn run_with_signal_handling(&self) -> Result<RunStats> {
        let context = self.cancel_handle();

        // Spawn signal handler task
        let signal_handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received Ctrl+C, cancelling run");
                    context.cancel(CancelReason::Interrupted);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
        });

        let result = self.run().await;

        // Abort signal handler if still running
        signal_handle.abort();

        result
    }
}

/// Put every item (suspending while the queue is full), then wait for drain
async fn submit_and_drain(queue: &WorkQueue<WorkItem>, source: WorkSource) -> Result<()> {
    for item in source {
        queue.put(item).await?;
    }
    tracing::debug!("All items submitted, waiting for drain");
    queue.join().await;
    Ok(())
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("config", &self.config)
            .field("transport", &self.transport.name())
            .finish()
    }
}
