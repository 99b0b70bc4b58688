//! Run-wide cancellation
//!
//! A [`RunContext`] is cloned into the driver and every worker. Any holder can
//! cancel the run with a [`CancelReason`]; every holder can observe it. The
//! first reason recorded wins, later ones are ignored.

use std::sync::Arc;

use tokio::sync::watch;

use crate::error::Error;

/// Why a run was cancelled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelReason {
    /// The user interrupted the process
    Interrupted,
    /// A transport failure under the fail-fast policy
    TransportFailure {
        /// Target the failing request was sent to
        target: String,
        /// Transport error text
        message: String,
    },
}

impl From<CancelReason> for Error {
    fn from(reason: CancelReason) -> Self {
        match reason {
            CancelReason::Interrupted => Error::Interrupted,
            CancelReason::TransportFailure { target, message } => Error::Aborted {
                target,
                reason: message,
            },
        }
    }
}

/// Shared cancellation state for one run
#[derive(Debug, Clone)]
pub struct RunContext {
    tx: Arc<watch::Sender<Option<CancelReason>>>,
    rx: watch::Receiver<Option<CancelReason>>,
}

impl RunContext {
    /// Create a context that has not been cancelled
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(None);
        Self { tx: Arc::new(tx), rx }
    }

    /// Cancel the run; returns `false` if it was already cancelled
    pub fn cancel(&self, reason: CancelReason) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        })
    }

    /// Reason the run was cancelled, if it was
    pub fn reason(&self) -> Option<CancelReason> {
        self.rx.borrow().clone()
    }

    /// Whether the run has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Wait until the run is cancelled
    pub async fn cancelled(&self) -> CancelReason {
        let mut rx = self.rx.clone();
        loop {
            if let Some(reason) = rx.borrow_and_update().clone() {
                return reason;
            }
            if rx.changed().await.is_err() {
                // Unreachable while `self` holds the sender.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
