//! Worker pool draining the work queue
//!
//! The Worker is the execution unit in qload, responsible for the simple loop:
//! **take -> request -> count -> mark done -> repeat**.
//!
//! Each Worker is a tokio task that:
//!
//! 1. Takes the next [`WorkItem`](crate::WorkItem) from the shared queue
//! 2. Sends one `GET /` through the [`HttpTransport`](crate::HttpTransport)
//! 3. Classifies the outcome (200 is success, anything else a failure)
//! 4. Records it in the shared [`ResultCounter`](crate::ResultCounter)
//! 5. Marks the item done, whatever the outcome
//! 6. Repeats until the queue closes or the run is cancelled
//!
//! A transport failure under [`FailurePolicy::Abort`](crate::FailurePolicy)
//! cancels the whole run through the shared [`RunContext`](crate::RunContext).
//!
//! # Example
//!
//! ```ignore
//! use qload_core::worker::{WorkerBuilder, WorkerPool};
//!
//! let template = WorkerBuilder::new(0)
//!     .transport(transport)
//!     .counter(counter)
//!     .context(context);
//!
//! let pool = WorkerPool::start(4, queue, template)?;
//! // ... put items, join the queue ...
//! let stats = pool.shutdown().await;
//! ```

mod builder;
mod executor;
mod pool;
mod stats;

pub use builder::WorkerBuilder;
pub use executor::Worker;
pub use pool::WorkerPool;
pub use stats::WorkerStats;
