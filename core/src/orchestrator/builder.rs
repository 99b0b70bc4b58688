//! Builder pattern for Orchestrator construction

use std::sync::Arc;

use crate::config::{FailurePolicy, RunConfig};
use crate::error::{Error, Result};
use crate::transport::HttpTransport;

use super::executor::Orchestrator;

/// Builder for creating an Orchestrator with proper configuration
///
/// # Example
///
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .target("localhost:9000")
///     .total_requests(10_000)
///     .concurrency(200)
///     .transport(transport)
///     .build()?;
/// ```
pub struct OrchestratorBuilder {
    config: RunConfig,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl OrchestratorBuilder {
    /// Create a new orchestrator builder with default configuration
    pub fn new() -> Self {
        Self {
            config: RunConfig::default(),
            transport: None,
        }
    }

    /// Set the full run configuration
    pub fn config(mut self, config: RunConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the target address (`host:port`)
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.config.target = target.into();
        self
    }

    /// Set the number of requests
    pub fn total_requests(mut self, total: usize) -> Self {
        self.config.total_requests = total;
        self
    }

    /// Set the concurrency level
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Set the queue capacity multiplier
    pub fn queue_capacity_multiplier(mut self, multiplier: usize) -> Self {
        self.config.queue_capacity_multiplier = multiplier;
        self
    }

    /// Set the transport failure policy
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.config.failure_policy = policy;
        self
    }

    /// Set the transport
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the orchestrator
    ///
    /// # Errors
    ///
    /// Returns an error if the transport is not set or if configuration
    /// validation fails.
    pub fn build(self) -> Result<Orchestrator> {
        let transport = self
            .transport
            .ok_or_else(|| Error::missing_config("transport"))?;

        self.config.validate()?;
        let target = self.config.parsed_target()?;

        Ok(Orchestrator::new(self.config, target, transport))
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
