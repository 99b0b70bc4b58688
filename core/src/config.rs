//! Run configuration types

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::queue::MAX_QUEUE_CAPACITY;
use crate::source::Target;

/// Default target address
pub const DEFAULT_TARGET: &str = "localhost:9000";
/// Default number of requests per run
pub const DEFAULT_TOTAL_REQUESTS: usize = 10_000;
/// Default worker pool size
pub const DEFAULT_CONCURRENCY: usize = 200;
/// Default queue capacity as a multiple of the pool size
pub const DEFAULT_QUEUE_CAPACITY_MULTIPLIER: usize = 2;

/// What a worker does when a request gets no response at all
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Log and count the failure, then take the next item
    #[default]
    Continue,
    /// Cancel the whole run
    Abort,
}

/// Run configuration
///
/// Defines the target, how many requests to send, and how many may be in
/// flight at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Target address as `host:port`
    pub target: String,

    /// Number of requests submitted in the run
    pub total_requests: usize,

    /// Number of workers (maximum requests in flight)
    pub concurrency: usize,

    /// Queue capacity = concurrency * multiplier
    pub queue_capacity_multiplier: usize,

    /// Transport failure handling
    pub failure_policy: FailurePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            total_requests: DEFAULT_TOTAL_REQUESTS,
            concurrency: DEFAULT_CONCURRENCY,
            queue_capacity_multiplier: DEFAULT_QUEUE_CAPACITY_MULTIPLIER,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl RunConfig {
    /// Create a config for the given target with default sizing
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Default::default()
        }
    }

    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Set the number of requests
    pub fn with_total_requests(mut self, total: usize) -> Self {
        self.total_requests = total;
        self
    }

    /// Set the worker count
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Set the queue capacity multiplier
    pub fn with_queue_capacity_multiplier(mut self, multiplier: usize) -> Self {
        self.queue_capacity_multiplier = multiplier;
        self
    }

    /// Set the transport failure policy
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Capacity of the work queue
    pub fn queue_capacity(&self) -> usize {
        self.concurrency.saturating_mul(self.queue_capacity_multiplier)
    }

    /// Parsed target
    pub fn parsed_target(&self) -> Result<Target> {
        self.target.parse()
    }

    /// Validate the configuration
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(
                "concurrency must be at least 1".into(),
            ));
        }

        if self.total_requests == 0 {
            return Err(ConfigError::InvalidRequestCount(
                "total requests must be at least 1".into(),
            ));
        }

        if self.queue_capacity_multiplier == 0 {
            return Err(ConfigError::InvalidQueueCapacity(
                "queue capacity multiplier must be at least 1".into(),
            ));
        }

        match self.concurrency.checked_mul(self.queue_capacity_multiplier) {
            Some(capacity) if capacity <= MAX_QUEUE_CAPACITY => {}
            _ => {
                return Err(ConfigError::InvalidQueueCapacity(format!(
                    "concurrency {} x multiplier {} exceeds the maximum queue capacity {}",
                    self.concurrency, self.queue_capacity_multiplier, MAX_QUEUE_CAPACITY
                )));
            }
        }

        if let Err(e) = self.parsed_target() {
            return Err(ConfigError::InvalidTarget(e.to_string()));
        }

        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid concurrency value
    #[error("Invalid concurrency: {0}")]
    InvalidConcurrency(String),

    /// Invalid request count
    #[error("Invalid request count: {0}")]
    InvalidRequestCount(String),

    /// Invalid queue capacity
    #[error("Invalid queue capacity: {0}")]
    InvalidQueueCapacity(String),

    /// Invalid target address
    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.target, "localhost:9000");
        assert_eq!(config.total_requests, 10_000);
        assert_eq!(config.concurrency, 200);
        assert_eq!(config.queue_capacity(), 400);
        assert_eq!(config.failure_policy, FailurePolicy::Continue);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder_pattern() {
        let config = RunConfig::new("example.com:8080")
            .with_total_requests(100)
            .with_concurrency(4)
            .with_queue_capacity_multiplier(3)
            .with_failure_policy(FailurePolicy::Abort);

        assert_eq!(config.total_requests, 100);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.queue_capacity(), 12);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.parsed_target().unwrap().port(), 8080);
    }

    #[test]
    fn test_config_validation_zero_concurrency() {
        let config = RunConfig::default().with_concurrency(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConcurrency(_))
        ));
    }

    #[test]
    fn test_config_validation_zero_requests() {
        let config = RunConfig::default().with_total_requests(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRequestCount(_))
        ));
    }

    #[test]
    fn test_config_validation_zero_multiplier() {
        let config = RunConfig::default().with_queue_capacity_multiplier(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQueueCapacity(_))
        ));
    }

    #[test]
    fn test_config_validation_oversized_queue() {
        let config = RunConfig::default()
            .with_concurrency(1)
            .with_queue_capacity_multiplier(usize::MAX);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQueueCapacity(_))
        ));

        // Product overflows usize
        let config = RunConfig::default()
            .with_concurrency(4)
            .with_queue_capacity_multiplier(usize::MAX / 2);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidQueueCapacity(_))
        ));

        let config = RunConfig::default()
            .with_concurrency(1)
            .with_queue_capacity_multiplier(MAX_QUEUE_CAPACITY);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_bad_target() {
        let config = RunConfig::new("localhost");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTarget(_))
        ));
    }

    #[test]
    fn test_failure_policy_snake_case() {
        assert_eq!(
            serde_json::to_string(&FailurePolicy::Abort).unwrap(),
            "\"abort\""
        );
        assert_eq!(
            serde_json::from_str::<FailurePolicy>("\"continue\"").unwrap(),
            FailurePolicy::Continue
        );
    }

    #[test]
    fn test_config_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"target": "127.0.0.1:8000", "concurrency": 8, "failure_policy": "abort"}}"#
        )
        .unwrap();

        let config = RunConfig::from_file(file.path()).unwrap();
        assert_eq!(config.target, "127.0.0.1:8000");
        assert_eq!(config.concurrency, 8);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.total_requests, DEFAULT_TOTAL_REQUESTS);
    }

    #[test]
    fn test_config_from_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            RunConfig::from_file(file.path()),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_config_from_missing_file() {
        assert!(matches!(
            RunConfig::from_file("/nonexistent/qload.json"),
            Err(Error::Io(_))
        ));
    }
}
