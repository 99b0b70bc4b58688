//! Shared outcome tallies for a run

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

/// Classification of a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The target answered 200
    Success,
    /// The target answered with any other status
    HttpFailure(u16),
    /// No status was obtained (connect, timeout, malformed response, ...)
    TransportFailure,
}

impl Outcome {
    /// Classify a response status; only 200 counts as success
    pub fn from_status(status: u16) -> Self {
        if status == 200 {
            Outcome::Success
        } else {
            Outcome::HttpFailure(status)
        }
    }

    /// Whether this outcome is a success
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::HttpFailure(status) => write!(f, "http {status}"),
            Outcome::TransportFailure => write!(f, "transport failure"),
        }
    }
}

/// Thread-safe tallies shared by every worker in a run
///
/// Transport failures count as failures and are also tallied on their own, so
/// `successes + failures` always equals the number of recorded outcomes.
#[derive(Debug, Default)]
pub struct ResultCounter {
    successes: AtomicUsize,
    failures: AtomicUsize,
    transport_errors: AtomicUsize,
}

impl ResultCounter {
    /// Create a zeroed counter
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one outcome
    pub fn record(&self, outcome: Outcome) {
        match outcome {
            Outcome::Success => {
                self.successes.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::HttpFailure(_) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
            Outcome::TransportFailure => {
                self.transport_errors.fetch_add(1, Ordering::Relaxed);
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Successful requests so far
    pub fn successes(&self) -> usize {
        self.successes.load(Ordering::Relaxed)
    }

    /// Failed requests so far, transport failures included
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Transport failures so far
    pub fn transport_errors(&self) -> usize {
        self.transport_errors.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of the tallies
    ///
    /// Only exact once every worker has stopped; while workers run the fields
    /// are read one at a time.
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            successes: self.successes(),
            failures: self.failures(),
            transport_errors: self.transport_errors(),
        }
    }
}

/// Plain copy of a [`ResultCounter`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    /// Requests answered with 200
    pub successes: usize,
    /// Requests that did not get a 200, transport failures included
    pub failures: usize,
    /// Requests that got no response at all
    pub transport_errors: usize,
}

impl CounterSnapshot {
    /// Total recorded outcomes
    pub fn processed(&self) -> usize {
        self.successes + self.failures
    }

    /// Failures that carried an HTTP status
    pub fn http_failures(&self) -> usize {
        self.failures - self.transport_errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_outcome_from_status() {
        assert_eq!(Outcome::from_status(200), Outcome::Success);
        assert_eq!(Outcome::from_status(204), Outcome::HttpFailure(204));
        assert_eq!(Outcome::from_status(500), Outcome::HttpFailure(500));
        assert!(Outcome::from_status(200).is_success());
        assert!(!Outcome::TransportFailure.is_success());
    }

    #[test]
    fn test_counter_record() {
        let counter = ResultCounter::new();
        counter.record(Outcome::Success);
        counter.record(Outcome::Success);
        counter.record(Outcome::HttpFailure(503));
        counter.record(Outcome::TransportFailure);

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.successes, 2);
        assert_eq!(snapshot.failures, 2);
        assert_eq!(snapshot.transport_errors, 1);
        assert_eq!(snapshot.http_failures(), 1);
        assert_eq!(snapshot.processed(), 4);
    }

    #[test]
    fn test_counter_concurrent_increments() {
        let counter = Arc::new(ResultCounter::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        if i % 2 == 0 {
                            counter.record(Outcome::Success);
                        } else {
                            counter.record(Outcome::HttpFailure(500));
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = counter.snapshot();
        assert_eq!(snapshot.successes, 4000);
        assert_eq!(snapshot.failures, 4000);
        assert_eq!(snapshot.processed(), 8000);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(Outcome::Success.to_string(), "success");
        assert_eq!(Outcome::HttpFailure(404).to_string(), "http 404");
    }
}
