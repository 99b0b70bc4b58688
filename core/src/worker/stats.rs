//! Worker statistics tracking

use std::time::Instant;

use crate::counter::Outcome;

/// Statistics tracked by each worker
#[derive(Debug, Default, Clone)]
pub struct WorkerStats {
    /// Items taken from the queue and processed
    pub processed: usize,

    /// Requests answered with 200
    pub successes: usize,

    /// Requests answered with any other status
    pub http_failures: usize,

    /// Requests that got no response
    pub transport_errors: usize,

    /// Worker start time
    pub started_at: Option<Instant>,

    /// Worker end time
    pub ended_at: Option<Instant>,
}

impl WorkerStats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking (records start time)
    pub fn start(&mut self) {
        self.started_at = Some(Instant::now());
    }

    /// Stop tracking (records end time)
    pub fn stop(&mut self) {
        self.ended_at = Some(Instant::now());
    }

    /// Record one processed item
    pub fn record(&mut self, outcome: Outcome) {
        self.processed += 1;
        match outcome {
            Outcome::Success => self.successes += 1,
            Outcome::HttpFailure(_) => self.http_failures += 1,
            Outcome::TransportFailure => self.transport_errors += 1,
        }
    }

    /// Failed requests of either kind
    pub fn failures(&self) -> usize {
        self.http_failures + self.transport_errors
    }

    /// Get elapsed time since start
    pub fn elapsed(&self) -> Option<std::time::Duration> {
        self.started_at.map(|start| {
            self.ended_at
                .map(|end| end.duration_since(start))
                .unwrap_or_else(|| start.elapsed())
        })
    }

    /// Merge stats from another worker
    pub fn merge(&mut self, other: &WorkerStats) {
        self.processed += other.processed;
        self.successes += other.successes;
        self.http_failures += other.http_failures;
        self.transport_errors += other.transport_errors;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_stats_defaults() {
        let stats = WorkerStats::default();
        assert_eq!(stats.processed, 0);
        assert_eq!(stats.failures(), 0);
        assert!(stats.started_at.is_none());
        assert!(stats.ended_at.is_none());
    }

    #[test]
    fn test_worker_stats_record() {
        let mut stats = WorkerStats::new();
        stats.record(Outcome::Success);
        stats.record(Outcome::HttpFailure(500));
        stats.record(Outcome::TransportFailure);

        assert_eq!(stats.processed, 3);
        assert_eq!(stats.successes, 1);
        assert_eq!(stats.http_failures, 1);
        assert_eq!(stats.transport_errors, 1);
        assert_eq!(stats.failures(), 2);
    }

    #[test]
    fn test_worker_stats_merge() {
        let mut a = WorkerStats::new();
        a.record(Outcome::Success);
        a.record(Outcome::Success);

        let mut b = WorkerStats::new();
        b.record(Outcome::HttpFailure(404));

        a.merge(&b);
        assert_eq!(a.processed, 3);
        assert_eq!(a.successes, 2);
        assert_eq!(a.http_failures, 1);
    }

    #[test]
    fn test_worker_stats_start_stop() {
        let mut stats = WorkerStats::new();
        assert!(stats.elapsed().is_none());

        stats.start();
        std::thread::sleep(std::time::Duration::from_millis(10));
        stats.stop();

        let elapsed = stats.elapsed().unwrap();
        assert!(elapsed >= std::time::Duration::from_millis(10));
    }
}
