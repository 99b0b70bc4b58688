//! Builder pattern for Worker construction

use crate::cancel::RunContext;
use crate::config::FailurePolicy;
use crate::counter::ResultCounter;
use crate::error::{Error, Result};
use crate::queue::WorkQueue;
use crate::source::WorkItem;
use crate::transport::HttpTransport;

use super::executor::Worker;

use std::sync::Arc;

/// Builder for creating Worker instances
///
/// The pool clones one configured builder per worker and sets the id.
///
/// # Example
/// ```ignore
/// let worker = WorkerBuilder::new(0)
///     .transport(transport)
///     .queue(queue)
///     .counter(counter)
///     .context(context)
///     .failure_policy(FailurePolicy::Abort)
///     .build()?;
/// ```
#[derive(Clone, Default)]
pub struct WorkerBuilder {
    id: usize,
    transport: Option<Arc<dyn HttpTransport>>,
    queue: Option<Arc<WorkQueue<WorkItem>>>,
    counter: Option<Arc<ResultCounter>>,
    context: Option<RunContext>,
    failure_policy: FailurePolicy,
}

impl WorkerBuilder {
    /// Create a new builder with the given worker ID
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Set the worker ID
    pub fn id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    /// Set the transport
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Set the work queue
    pub fn queue(mut self, queue: Arc<WorkQueue<WorkItem>>) -> Self {
        self.queue = Some(queue);
        self
    }

    /// Set the shared result counter
    pub fn counter(mut self, counter: Arc<ResultCounter>) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Set the run's cancellation context
    pub fn context(mut self, context: RunContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Set the transport failure policy (defaults to continue)
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Build the Worker
    ///
    /// # Errors
    /// Returns an error if any required field is missing.
    pub fn build(self) -> Result<Worker> {
        let transport = self
            .transport
            .ok_or(Error::missing_config("transport"))?;
        let queue = self.queue.ok_or(Error::missing_config("queue"))?;
        let counter = self.counter.ok_or(Error::missing_config("counter"))?;
        let context = self.context.ok_or(Error::missing_config("context"))?;

        Ok(Worker::new(
            self.id,
            transport,
            queue,
            counter,
            context,
            self.failure_policy,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue() -> Arc<WorkQueue<WorkItem>> {
        Arc::new(WorkQueue::new(1).unwrap())
    }

    #[test]
    fn test_builder_missing_transport() {
        let result = WorkerBuilder::new(0)
            .queue(queue())
            .counter(Arc::new(ResultCounter::new()))
            .context(RunContext::new())
            .build();

        let err = result.unwrap_err();
        assert!(matches!(err, Error::MissingConfig("transport")));
    }

    #[test]
    fn test_builder_missing_queue() {
        let result = WorkerBuilder::new(0)
            .counter(Arc::new(ResultCounter::new()))
            .context(RunContext::new())
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_builder_missing_counter_and_context() {
        assert!(WorkerBuilder::new(0).queue(queue()).build().is_err());
        assert!(WorkerBuilder::new(0)
            .queue(queue())
            .counter(Arc::new(ResultCounter::new()))
            .build()
            .is_err());
    }
}
