//! Outbound request queue
//!
//! Strictly-FIFO, single-consumer delivery pipeline: one background worker
//! dequeues requests in submission order, attaches the current ticket
//! (logging in first if needed), and sends them through the transport. One
//! request is ever in flight at a time; the remote's per-request processing
//! is not assumed commutative, so delivery order must equal submission order.
//!
//! Failure policy: a request that cannot be authenticated, or whose transport
//! call fails, is logged as failed and dropped; callers re-submit if they
//! want a retry. An auth rejection mid-dispatch gets exactly one
//! re-login + re-send before giving up.

use crate::http::{HttpTransport, Request, TransportError};
use crate::log::GuiLog;
use crate::ticket::TicketManager;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Running totals of dispatch outcomes
///
/// Every offered request ends up in exactly one of these counters once the
/// worker has processed it; nothing is dropped silently.
#[derive(Debug, Default)]
pub struct DispatchStats {
    delivered: AtomicU64,
    failed: AtomicU64,
}

impl DispatchStats {
    /// Requests confirmed delivered
    #[must_use]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::SeqCst)
    }

    /// Requests that ended in a recorded failure
    #[must_use]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::SeqCst)
    }
}

/// Why a dispatch attempt was recorded as failed
#[derive(Debug, thiserror::Error)]
enum DispatchFailure {
    #[error("could not authenticate with the MMS")]
    Unauthenticated,
    #[error("re-login after a rejected ticket failed")]
    ReloginFailed,
    #[error("{0}")]
    Transport(#[from] TransportError),
    #[error("server returned status {0}")]
    Status(u16),
}

/// Ordered, asynchronous, single-consumer delivery queue
///
/// One queue exists per sync context; the worker runs until the context is
/// shut down.
#[derive(Debug)]
pub struct RequestQueue {
    sender: Mutex<Option<mpsc::UnboundedSender<Request>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
    stats: Arc<DispatchStats>,
}

impl RequestQueue {
    /// Start the queue and its background worker
    #[must_use]
    pub fn start(
        ticket_manager: Arc<TicketManager>,
        transport: Arc<dyn HttpTransport>,
        gui: Arc<dyn GuiLog>,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let stats = Arc::new(DispatchStats::default());
        let worker = tokio::spawn(dispatch_loop(
            receiver,
            ticket_manager,
            transport,
            gui,
            Arc::clone(&stats),
        ));
        Self {
            sender: Mutex::new(Some(sender)),
            worker: Mutex::new(Some(worker)),
            stats,
        }
    }

    /// Enqueue a request for eventual dispatch; never blocks the caller
    ///
    /// Returns `false` (and records a failure) only when the queue has
    /// already been shut down.
    pub fn offer(&self, request: Request) -> bool {
        let accepted = self
            .sender
            .lock()
            .as_ref()
            .is_some_and(|tx| tx.send(request).is_ok());
        if !accepted {
            self.stats.failed.fetch_add(1, Ordering::SeqCst);
            tracing::error!("request offered after queue shutdown");
        }
        accepted
    }

    /// Dispatch outcome counters
    #[must_use]
    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Stop accepting requests, drain everything already queued, and wait
    /// for the worker to finish
    pub async fn shutdown(&self) {
        drop(self.sender.lock().take());
        let worker = self.worker.lock().take();
        if let Some(worker) = worker {
            let _ = worker.await;
        }
    }
}

async fn dispatch_loop(
    mut receiver: mpsc::UnboundedReceiver<Request>,
    ticket_manager: Arc<TicketManager>,
    transport: Arc<dyn HttpTransport>,
    gui: Arc<dyn GuiLog>,
    stats: Arc<DispatchStats>,
) {
    while let Some(request) = receiver.recv().await {
        match dispatch_one(&request, &ticket_manager, transport.as_ref()).await {
            Ok(()) => {
                stats.delivered.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(url = request.url(), "request delivered");
            }
            Err(failure) => {
                stats.failed.fetch_add(1, Ordering::SeqCst);
                gui.error(&format!(
                    "{} request to {} failed. Reason: {failure}",
                    request.method(),
                    request.url()
                ));
            }
        }
    }
}

async fn dispatch_one(
    request: &Request,
    ticket_manager: &Arc<TicketManager>,
    transport: &dyn HttpTransport,
) -> Result<(), DispatchFailure> {
    if !ticket_manager.is_authenticated() && !ticket_manager.login().await {
        return Err(DispatchFailure::Unauthenticated);
    }

    let response = transport
        .execute(&request.with_ticket(&ticket_manager.ticket()))
        .await?;
    if response.is_success() {
        return Ok(());
    }
    if !response.is_auth_failure() {
        return Err(DispatchFailure::Status(response.status()));
    }

    // expired or revoked ticket detected mid-dispatch: one re-login, one
    // re-send, then give up
    ticket_manager.invalidate_ticket();
    if !ticket_manager.login().await {
        return Err(DispatchFailure::ReloginFailed);
    }
    let retried = transport
        .execute(&request.with_ticket(&ticket_manager.ticket()))
        .await?;
    if retried.is_success() {
        Ok(())
    } else {
        Err(DispatchFailure::Status(retried.status()))
    }
}
