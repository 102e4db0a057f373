//! Per-tenant FIFO scheduler
//!
//! Every tenant owns one [`TenantScheduler`]. Submitted actions are pushed
//! onto an unbounded channel drained by a single background task, so at most
//! one action per tenant is in flight while different tenants progress
//! independently.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use helpdesk_domain::{HelpdeskError, Result};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Serializes asynchronous actions for one tenant.
///
/// States: running (initial) and paused. Pausing only rejects new
/// submissions; work already accepted keeps running to completion.
#[derive(Debug)]
pub struct TenantScheduler {
    tenant: Arc<str>,
    sender: mpsc::UnboundedSender<Job>,
    paused: AtomicBool,
    queued: Arc<AtomicUsize>,
}

impl TenantScheduler {
    /// Create a scheduler and spawn its worker task.
    ///
    /// Must be called from within a tokio runtime. The worker exits once the
    /// scheduler is dropped and the queue is empty.
    pub fn new(tenant: impl Into<Arc<str>>) -> Self {
        let tenant = tenant.into();
        let (sender, mut receiver) = mpsc::unbounded_channel::<Job>();

        let worker_tenant = Arc::clone(&tenant);
        tokio::spawn(async move {
            while let Some(job) = receiver.recv().await {
                job.await;
            }
            debug!(tenant = %worker_tenant, "tenant scheduler worker stopped");
        });

        Self { tenant, sender, paused: AtomicBool::new(false), queued: Arc::new(AtomicUsize::new(0)) }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    /// Queue `action` behind every previously accepted action.
    ///
    /// The future is not polled until its turn comes. Its outcome, including
    /// a panic (reported as [`HelpdeskError::Internal`]), is delivered only
    /// through the returned [`Ticket`] and never affects later actions.
    ///
    /// # Errors
    /// Returns [`HelpdeskError::Unavailable`] immediately when paused.
    pub fn submit<F, T>(&self, action: F) -> Result<Ticket<T>>
    where
        F: Future<Output = Result<T>> + Send + 'static,
        T: Send + 'static,
    {
        if self.is_paused() {
            warn!(tenant = %self.tenant, "submission rejected, scheduler paused");
            return Err(HelpdeskError::unavailable());
        }

        let (reply, receiver) = oneshot::channel();
        let queued = Arc::clone(&self.queued);
        let job: Job = Box::pin(async move {
            let outcome = AssertUnwindSafe(action)
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| Err(HelpdeskError::Internal(panic_message(&*panic))));
            queued.fetch_sub(1, Ordering::SeqCst);
            // The caller may have stopped waiting; the action still ran.
            let _ = reply.send(outcome);
        });

        self.queued.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(job).is_err() {
            self.queued.fetch_sub(1, Ordering::SeqCst);
            return Err(HelpdeskError::Internal(format!(
                "scheduler worker for tenant '{}' is not running",
                self.tenant
            )));
        }

        Ok(Ticket { receiver })
    }

    /// Stop accepting new work. Idempotent.
    pub fn pause(&self) {
        if !self.paused.swap(true, Ordering::SeqCst) {
            warn!(tenant = %self.tenant, queued = self.queued(), "tenant scheduler paused");
        }
    }

    /// Accept new work again. Idempotent.
    pub fn resume(&self) {
        if self.paused.swap(false, Ordering::SeqCst) {
            warn!(tenant = %self.tenant, "tenant scheduler resumed");
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }

    /// Number of accepted actions that have not settled yet.
    pub fn queued(&self) -> usize {
        self.queued.load(Ordering::SeqCst)
    }

    /// Handle resolving once every action accepted before this call settled.
    ///
    /// The drain marker is queued even while paused.
    pub fn drain(&self) -> DrainHandle {
        let (done, receiver) = oneshot::channel();
        let tenant = Arc::clone(&self.tenant);
        let marker: Job = Box::pin(async move {
            info!(tenant = %tenant, "tenant scheduler drained");
            let _ = done.send(());
        });

        // A stopped worker has nothing left to drain; the handle then
        // resolves as soon as the dropped marker closes the channel.
        let _ = self.sender.send(marker);
        DrainHandle { receiver }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
    format!("scheduled action panicked: {detail}")
}

/// Outcome of one submitted action.
#[derive(Debug)]
#[must_use = "a ticket does nothing unless awaited"]
pub struct Ticket<T> {
    receiver: oneshot::Receiver<Result<T>>,
}

impl<T> Future for Ticket<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|received| {
            received.unwrap_or_else(|_| {
                Err(HelpdeskError::Internal("scheduled action was dropped".to_string()))
            })
        })
    }
}

/// Completion signal returned by [`TenantScheduler::drain`].
#[derive(Debug)]
#[must_use = "a drain handle does nothing unless awaited"]
pub struct DrainHandle {
    receiver: oneshot::Receiver<()>,
}

impl Future for DrainHandle {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver).poll(cx).map(|_| ())
    }
}
