//! Run summary and per-worker aggregation

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::counter::CounterSnapshot;
use crate::worker::WorkerStats;

/// Summary of one completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Target address
    pub target: String,

    /// Requests submitted
    pub total_requests: usize,

    /// Requests answered with 200
    pub successes: usize,

    /// Requests that did not get a 200, transport failures included
    pub failures: usize,

    /// Requests that got no response
    pub transport_errors: usize,

    /// Worker pool size
    pub concurrency: usize,

    /// Wall-clock time from first submission to drain
    pub elapsed_secs: f64,

    /// Completed requests per second over the run
    pub requests_per_second: f64,

    /// When submission started
    pub started_at: DateTime<Utc>,
}

impl RunStats {
    /// Build the summary from the final counter values
    pub fn new(
        target: impl Into<String>,
        total_requests: usize,
        concurrency: usize,
        counts: CounterSnapshot,
        elapsed: Duration,
        started_at: DateTime<Utc>,
    ) -> Self {
        let elapsed_secs = elapsed.as_secs_f64();
        let requests_per_second = if elapsed_secs > 0.0 {
            counts.processed() as f64 / elapsed_secs
        } else {
            0.0
        };

        Self {
            target: target.into(),
            total_requests,
            successes: counts.successes,
            failures: counts.failures,
            transport_errors: counts.transport_errors,
            concurrency,
            elapsed_secs,
            requests_per_second,
            started_at,
        }
    }

    /// Get the success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_requests > 0 {
            self.successes as f64 / self.total_requests as f64
        } else {
            0.0
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Target:           {}", self.target)?;
        writeln!(f, "Total requests:   {}", self.total_requests)?;
        writeln!(
            f,
            "Successes:        {} ({:.1}%)",
            self.successes,
            self.success_rate() * 100.0
        )?;
        writeln!(
            f,
            "Failures:         {} ({} transport errors)",
            self.failures, self.transport_errors
        )?;
        writeln!(f, "Elapsed:          {:.3}s", self.elapsed_secs)?;
        write!(f, "Throughput:       {:.1} req/s", self.requests_per_second)
    }
}

/// Spread of work across the pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregatedWorkerStats {
    /// Number of workers that reported
    pub total_workers: usize,

    /// Items processed by all workers
    pub processed: usize,

    /// Transport errors seen by all workers
    pub transport_errors: usize,

    /// Fewest items processed by a single worker
    pub min_processed: usize,

    /// Most items processed by a single worker
    pub max_processed: usize,
}

/// Aggregate statistics from multiple workers
pub fn aggregate_worker_stats(stats: &[WorkerStats]) -> AggregatedWorkerStats {
    if stats.is_empty() {
        return AggregatedWorkerStats::default();
    }

    let mut totals = WorkerStats::new();
    for s in stats {
        totals.merge(s);
    }

    AggregatedWorkerStats {
        total_workers: stats.len(),
        processed: totals.processed,
        transport_errors: totals.transport_errors,
        min_processed: stats.iter().map(|s| s.processed).min().unwrap_or(0),
        max_processed: stats.iter().map(|s| s.processed).max().unwrap_or(0),
    }
}
