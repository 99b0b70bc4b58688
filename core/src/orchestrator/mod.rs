//! Orchestrator for the run lifecycle
//!
//! The Orchestrator drives one load run end to end:
//! - Creating the bounded queue and the result counter
//! - Starting the worker pool before any work is submitted
//! - Submitting every item, suspending while the queue is full
//! - Waiting for the queue to drain, or for cancellation
//! - Producing the [`RunStats`] summary
//!
//! # Example
//!
//! ```ignore
//! use qload_core::OrchestratorBuilder;
//!
//! let orchestrator = OrchestratorBuilder::new()
//!     .target("localhost:9000")
//!     .concurrency(200)
//!     .total_requests(10_000)
//!     .transport(transport)
//!     .build()?;
//!
//! let stats = orchestrator.run_with_signal_handling().await?;
//! println!("{stats}");
//! ```

mod aggregator;
mod builder;
mod executor;

pub use aggregator::{aggregate_worker_stats, AggregatedWorkerStats, RunStats};
pub use builder::OrchestratorBuilder;
pub use executor::Orchestrator;
