//! Per-process sync session context
//!
//! Owns the credential store, the ticket manager, and the request queue.
//! Callers hold one context per host session instead of reaching for global
//! state; tests build as many as they like, each fully isolated.

use crate::config::MmsConfig;
use crate::credentials::{CredentialProvider, CredentialStore};
use crate::error::ClientError;
use crate::http::{HttpTransport, Request, ReqwestTransport};
use crate::log::GuiLog;
use crate::queue::RequestQueue;
use crate::ticket::TicketManager;
use std::sync::Arc;
use std::sync::OnceLock;

/// Injectable session context for one MMS connection
pub struct SyncContext {
    transport: Arc<dyn HttpTransport>,
    gui: Arc<dyn GuiLog>,
    ticket_manager: Arc<TicketManager>,
    queue: OnceLock<RequestQueue>,
}

impl SyncContext {
    /// New context around an explicit transport (tests, alternative stacks)
    #[must_use]
    pub fn new(
        config: MmsConfig,
        transport: Arc<dyn HttpTransport>,
        provider: Arc<dyn CredentialProvider>,
        gui: Arc<dyn GuiLog>,
    ) -> Self {
        let store = Arc::new(CredentialStore::new());
        let ticket_manager = TicketManager::new(
            config,
            store,
            Arc::clone(&transport),
            provider,
            Arc::clone(&gui),
        );
        Self {
            transport,
            gui,
            ticket_manager,
            queue: OnceLock::new(),
        }
    }

    /// New context with the production `reqwest` transport
    ///
    /// # Errors
    /// `ClientError::Transport` if the HTTP client cannot be built.
    pub fn with_reqwest(
        config: MmsConfig,
        provider: Arc<dyn CredentialProvider>,
        gui: Arc<dyn GuiLog>,
    ) -> Result<Self, ClientError> {
        let transport = Arc::new(ReqwestTransport::new(config.request_timeout())?);
        Ok(Self::new(config, transport, provider, gui))
    }

    /// The ticket manager for this connection
    #[must_use]
    pub fn ticket_manager(&self) -> &Arc<TicketManager> {
        &self.ticket_manager
    }

    /// The credential store for this connection
    #[must_use]
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        self.ticket_manager.credentials()
    }

    /// The user-visible log sink
    #[must_use]
    pub fn gui(&self) -> &Arc<dyn GuiLog> {
        &self.gui
    }

    /// The outbound request queue, started lazily on first use
    ///
    /// Must be called from within a tokio runtime, which is where every
    /// caller of the queue already lives.
    pub fn queue(&self) -> &RequestQueue {
        self.queue.get_or_init(|| {
            RequestQueue::start(
                Arc::clone(&self.ticket_manager),
                Arc::clone(&self.transport),
                Arc::clone(&self.gui),
            )
        })
    }

    /// Convenience for `self.queue().offer(request)`
    pub fn offer(&self, request: Request) -> bool {
        self.queue().offer(request)
    }

    /// Drain the queue, stop the worker and the renewal task, and wait for
    /// both to finish
    pub async fn shutdown(&self) {
        if let Some(queue) = self.queue.get() {
            queue.shutdown().await;
        }
        if let Some(renewal) = self.ticket_manager.stop_renewal() {
            let _ = renewal.await;
        }
    }
}

impl std::fmt::Debug for SyncContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncContext")
            .field("ticket_manager", &self.ticket_manager)
            .field("queue_started", &self.queue.get().is_some())
            .finish_non_exhaustive()
    }
}
