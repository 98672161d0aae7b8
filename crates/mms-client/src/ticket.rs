//! Ticket acquisition, validation, and auto-renewal
//!
//! One [`TicketManager`] owns one authentication ticket against one MMS
//! server. Acquisition fails closed (no ticket), the periodic validity check
//! fails open (an unreachable server never logs a user out), and renewal runs
//! on its own cancellable background task.

use crate::config::MmsConfig;
use crate::credentials::{CredentialProvider, CredentialStore};
use crate::error::ClientError;
use crate::http::{HttpTransport, Request};
use crate::log::GuiLog;
use crate::wire::{self, TicketStatus};
use parking_lot::Mutex;
use serde_json::json;
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to the running renewal task
///
/// Signalling shutdown is synchronous; the returned join handle lets the
/// owning context wait for the task to wind down.
#[derive(Debug)]
struct RenewalHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Obtains and keeps alive a single authentication ticket
pub struct TicketManager {
    config: MmsConfig,
    store: Arc<CredentialStore>,
    transport: Arc<dyn HttpTransport>,
    provider: Arc<dyn CredentialProvider>,
    gui: Arc<dyn GuiLog>,
    renewal: Mutex<Option<RenewalHandle>>,
    // handed to the renewal task so it can call back into the manager
    weak_self: Weak<TicketManager>,
}

impl TicketManager {
    /// New manager around the given collaborators
    #[must_use]
    pub fn new(
        config: MmsConfig,
        store: Arc<CredentialStore>,
        transport: Arc<dyn HttpTransport>,
        provider: Arc<dyn CredentialProvider>,
        gui: Arc<dyn GuiLog>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            config,
            store,
            transport,
            provider,
            gui,
            renewal: Mutex::new(None),
            weak_self: weak.clone(),
        })
    }

    /// The credential store this manager guards
    #[must_use]
    pub fn credentials(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    /// Current ticket, empty when unauthenticated
    #[must_use]
    pub fn ticket(&self) -> String {
        self.store.ticket()
    }

    /// Whether a ticket is currently held
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// Whether the renewal task is currently scheduled
    #[must_use]
    pub fn renewal_active(&self) -> bool {
        self.renewal.lock().is_some()
    }

    /// Returns the stored username, prompting for credentials first when
    /// none are stored and prompting is enabled
    pub async fn username(&self) -> String {
        let current = self.store.username();
        if !current.is_empty() || self.config.popups_disabled() {
            return current;
        }
        if let Some(creds) = self.provider.obtain("").await {
            self.store.set_credentials(&creds.username, &creds.password);
        }
        self.store.username()
    }

    /// Log in to the MMS
    ///
    /// Pre-specified credentials are used directly (and the password erased
    /// regardless of outcome). Otherwise the credential provider is consulted,
    /// unless popups are disabled, in which case this returns `false`
    /// immediately; the automation path never blocks waiting for input.
    pub async fn login(&self) -> bool {
        if let Some(creds) = self.store.take_credentials() {
            self.acquire_ticket(&creds.password).await;
        } else if !self.config.popups_disabled() {
            if let Some(creds) = self.provider.obtain(&self.store.username()).await {
                self.store.set_username(&creds.username);
                self.acquire_ticket(&creds.password).await;
            }
        } else {
            return false;
        }
        self.store.is_authenticated()
    }

    /// Query the server for a new ticket using the stored username
    ///
    /// The existing ticket is cleared first, so the fail-safe default is
    /// "unauthenticated". Transport and parse failures are logged and
    /// absorbed; a failed login must not crash the calling action. On success
    /// the periodic renewal task is started.
    pub async fn acquire_ticket(&self, password: &str) {
        self.stop_renewal();
        self.store.clear_ticket();

        let username = self.store.username();
        if username.is_empty() {
            return;
        }
        let url = match self.config.login_url() {
            Ok(url) => url,
            Err(e) => {
                self.gui.error(&format!(
                    "Unexpected error while acquiring credentials. Reason: {e}"
                ));
                return;
            }
        };

        let request = Request::post(url, json!({"username": username, "password": password}));
        let response = match self.transport.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.gui.error(&format!(
                    "Unexpected error while acquiring credentials. Reason: {e}"
                ));
                return;
            }
        };
        if !response.is_success() {
            self.gui.error(&format!(
                "Unexpected error while acquiring credentials. Server returned status {}",
                response.status()
            ));
            return;
        }

        if let Some(ticket) = wire::login_ticket(response.body()) {
            self.store.set_ticket(&ticket);
            self.start_renewal();
        }
    }

    /// Check whether the stored ticket is still valid
    ///
    /// Empty ticket: `Ok(false)` without a request. A server verdict of
    /// "Ticket not found", or a username that does not match the stored one,
    /// logs the expiry, forces a logout, and returns `Ok(false)`. A URL-build
    /// failure returns `Ok(true)`: it cannot confirm the ticket invalid, and
    /// any such failure would already have surfaced when the ticket was
    /// acquired. Transport errors are returned to the caller; the renewal
    /// loop treats them as "assume still valid".
    ///
    /// # Errors
    /// `ClientError::Transport` when the status endpoint cannot be reached.
    pub async fn check_acquired_ticket(&self) -> Result<bool, ClientError> {
        let ticket = self.store.ticket();
        if ticket.is_empty() {
            return Ok(false);
        }

        let url = match self.config.ticket_url(&ticket) {
            Ok(url) => url,
            Err(e) => {
                self.gui.error(&format!(
                    "Unexpected error in generation of MMS URL for project. Reason: {e}"
                ));
                return Ok(true);
            }
        };

        let response = self.transport.execute(&Request::get(url)).await?;
        let status = TicketStatus::from_body(response.body());
        if status.is_not_found() || status.username_mismatch(&self.store.username()) {
            self.gui
                .warning("Authentication has expired. Please log in to the MMS again.");
            self.logout();
            return Ok(false);
        }
        Ok(true)
    }

    /// Drop the current ticket but keep stored credentials, forcing the next
    /// dispatch to re-login
    pub fn invalidate_ticket(&self) {
        self.store.clear_ticket();
    }

    /// Clear all credential state and stop renewal
    pub fn logout(&self) {
        self.store.clear();
        self.stop_renewal();
    }

    /// Signal the renewal task to stop and hand back its join handle
    ///
    /// Callers that need a clean shutdown await the handle; the renewal task
    /// itself may trigger this via a forced logout, which is why this never
    /// awaits in place.
    pub fn stop_renewal(&self) -> Option<JoinHandle<()>> {
        let handle = self.renewal.lock().take()?;
        let _ = handle.shutdown.send(true);
        Some(handle.task)
    }

    fn start_renewal(&self) {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let manager = self.weak_self.clone();
        let interval = self.config.renewal_interval();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // the zeroth tick fires immediately; the first check should come
            // one full interval after login
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        // the task ends with the manager
                        let Some(manager) = manager.upgrade() else { break };
                        // a transient network blip must not kill the schedule
                        if let Err(e) = manager.check_acquired_ticket().await {
                            tracing::debug!("ticket renewal check inconclusive: {e}");
                        }
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        *self.renewal.lock() = Some(RenewalHandle { shutdown, task });
    }
}

impl std::fmt::Debug for TicketManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TicketManager")
            .field("authenticated", &self.is_authenticated())
            .field("renewal_active", &self.renewal_active())
            .finish_non_exhaustive()
    }
}
