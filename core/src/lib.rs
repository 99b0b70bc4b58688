//! qload-core: Core engine for the qload HTTP load generator
//!
//! This crate provides everything a run needs apart from the real HTTP
//! client, including:
//!
//! - The bounded work queue with drain tracking
//! - The worker pool and its per-worker statistics
//! - The shared result counter
//! - The transport trait the workers send requests through
//! - The orchestrator that drives a run and reports its summary
//! - Run configuration, cancellation and error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cancel;
pub mod config;
pub mod counter;
pub mod error;
pub mod orchestrator;
pub mod queue;
pub mod source;
pub mod transport;
pub mod worker;

pub use cancel::{CancelReason, RunContext};
pub use config::{ConfigError, FailurePolicy, RunConfig};
pub use counter::{CounterSnapshot, Outcome, ResultCounter};
pub use error::*;
pub use orchestrator::{Orchestrator, OrchestratorBuilder, RunStats};
pub use queue::{WorkQueue, MAX_QUEUE_CAPACITY};
pub use source::{Target, WorkItem, WorkSource};
pub use transport::{HttpResponse, HttpTransport, TransportError};
pub use worker::{Worker, WorkerBuilder, WorkerPool, WorkerStats};
