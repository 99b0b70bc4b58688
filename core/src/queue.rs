//! Bounded FIFO work queue with drain tracking
//!
//! [`WorkQueue`] connects the driver to the worker pool. It is a bounded
//! `tokio::sync::mpsc` channel whose receiver is shared by every worker, plus
//! an outstanding-item counter that lets the driver wait until every item it
//! put has been taken *and* marked done.
//!
//! - [`WorkQueue::put`] suspends while the queue is full, so the driver is
//!   throttled to the rate the workers drain it. Items are never dropped.
//! - [`WorkQueue::get`] suspends while the queue is empty and returns `None`
//!   once the queue has been closed and emptied.
//! - [`WorkQueue::mark_done`] is called once per item taken.
//! - [`WorkQueue::join`] resolves when the outstanding count reaches zero.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::{mpsc, Mutex, Notify};

use crate::error::{Error, Result};

/// Largest capacity a queue can be created with
pub const MAX_QUEUE_CAPACITY: usize = tokio::sync::Semaphore::MAX_PERMITS;

/// Bounded multi-consumer work queue
pub struct WorkQueue<T> {
    tx: mpsc::Sender<T>,
    rx: Mutex<mpsc::Receiver<T>>,
    outstanding: AtomicUsize,
    drained: Notify,
    closed: AtomicBool,
    closing: Notify,
}

impl<T: Send> WorkQueue<T> {
    /// Create a queue holding at most `capacity` items
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `capacity` is zero or above
    /// [`MAX_QUEUE_CAPACITY`].
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::config("queue capacity must be at least 1"));
        }
        if capacity > MAX_QUEUE_CAPACITY {
            return Err(Error::config(format!(
                "queue capacity {capacity} exceeds the maximum {MAX_QUEUE_CAPACITY}"
            )));
        }
        let (tx, rx) = mpsc::channel(capacity);
        Ok(Self {
            tx,
            rx: Mutex::new(rx),
            outstanding: AtomicUsize::new(0),
            drained: Notify::new(),
            closed: AtomicBool::new(false),
            closing: Notify::new(),
        })
    }

    /// Enqueue an item, waiting for free capacity
    ///
    /// The outstanding count is only raised once a slot has been reserved, so
    /// dropping this future while it waits leaves the queue untouched.
    ///
    /// # Errors
    ///
    /// Returns a queue error if the queue has been closed.
    pub async fn put(&self, item: T) -> Result<()> {
        if self.is_closed() {
            return Err(Error::queue("put on a closed queue"));
        }
        let permit = self
            .tx
            .reserve()
            .await
            .map_err(|_| Error::queue("put on a closed queue"))?;
        self.outstanding.fetch_add(1, Ordering::AcqRel);
        permit.send(item);
        Ok(())
    }

    /// Take the next item, waiting while the queue is empty
    ///
    /// Returns `None` once the queue is closed and every buffered item has
    /// been taken. Waiting consumers are served in arrival order.
    pub async fn get(&self) -> Option<T> {
        let mut rx = self.rx.lock().await;
        loop {
            let closing = self.closing.notified();
            tokio::pin!(closing);
            closing.as_mut().enable();

            if let Ok(item) = rx.try_recv() {
                return Some(item);
            }
            if self.is_closed() {
                return None;
            }

            tokio::select! {
                item = rx.recv() => return item,
                _ = &mut closing => continue,
            }
        }
    }

    /// Record that one previously taken item has been fully processed
    ///
    /// # Errors
    ///
    /// Returns a queue error if called more times than items were put.
    pub fn mark_done(&self) -> Result<()> {
        let previous = self
            .outstanding
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .map_err(|_| Error::queue("mark_done called more times than items were put"))?;

        if previous == 1 {
            self.drained.notify_waiters();
        }
        Ok(())
    }

    /// Wait until every item put so far has been marked done
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register before checking so a concurrent mark_done cannot slip
            // between the check and the await.
            notified.as_mut().enable();

            if self.outstanding.load(Ordering::Acquire) == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Stop accepting items
    ///
    /// Items already buffered can still be taken; once they are gone,
    /// [`get`](Self::get) returns `None`.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
        self.closing.notify_waiters();
    }

    /// Whether [`close`](Self::close) has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Number of items currently buffered
    pub fn len(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    /// Whether no items are buffered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Maximum number of buffered items
    pub fn capacity(&self) -> usize {
        self.tx.max_capacity()
    }

    /// Items put but not yet marked done
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::Acquire)
    }
}

impl<T> std::fmt::Debug for WorkQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkQueue")
            .field("capacity", &self.tx.max_capacity())
            .field("available", &self.tx.capacity())
            .field("outstanding", &self.outstanding.load(Ordering::Relaxed))
            .field("closed", &self.closed.load(Ordering::Relaxed))
            .finish()
    }
}
