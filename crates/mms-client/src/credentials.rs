//! Credential state and the credential-prompt capability
//!
//! The store is a guarded value holder with whole-value reads and writes: a
//! concurrent reader sees either the old or the new state, never a torn mix.
//! No network or validation logic lives here.

use async_trait::async_trait;
use parking_lot::RwLock;

/// A username/password pair as produced by a credential prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct CredentialState {
    username: String,
    password: String,
    ticket: String,
}

/// Holder of the current username, one-shot password, and ticket
///
/// The password is never retained after a ticket acquisition attempt:
/// [`CredentialStore::take_credentials`] hands it out exactly once and clears
/// it. The ticket is the empty string when unauthenticated.
#[derive(Debug, Default)]
pub struct CredentialStore {
    state: RwLock<CredentialState>,
}

impl CredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-set username and password, e.g. for automation
    pub fn set_credentials(&self, username: &str, password: &str) {
        let mut state = self.state.write();
        state.username = username.to_owned();
        state.password = password.to_owned();
    }

    /// Remember a username without touching the password
    pub fn set_username(&self, username: &str) {
        self.state.write().username = username.to_owned();
    }

    /// Currently stored username, possibly empty
    #[must_use]
    pub fn username(&self) -> String {
        self.state.read().username.clone()
    }

    /// Take the stored credentials for one login attempt
    ///
    /// Returns `Some` only when both username and password are set, and
    /// clears the password either way. The username is kept for prompt
    /// pre-fill and ticket validation.
    #[must_use]
    pub fn take_credentials(&self) -> Option<Credentials> {
        let mut state = self.state.write();
        let password = std::mem::take(&mut state.password);
        if state.username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Credentials::new(state.username.clone(), password))
    }

    /// Current ticket, empty when unauthenticated
    #[must_use]
    pub fn ticket(&self) -> String {
        self.state.read().ticket.clone()
    }

    pub(crate) fn set_ticket(&self, ticket: &str) {
        self.state.write().ticket = ticket.to_owned();
    }

    pub(crate) fn clear_ticket(&self) {
        self.state.write().ticket = String::new();
    }

    /// Whether a ticket is currently held
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.state.read().ticket.is_empty()
    }

    /// Clear username, password, and ticket
    ///
    /// Callers go through [`crate::TicketManager::logout`], which also stops
    /// ticket renewal.
    pub fn clear(&self) {
        *self.state.write() = CredentialState::default();
    }
}

/// Capability to obtain credentials from the user
///
/// The interactive implementation lives with the host UI; automation uses
/// [`StaticCredentialProvider`] or [`NoPrompt`]. The ticket manager depends
/// only on this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Ask for credentials, pre-filling `current_username` when known.
    /// Returns `None` when the user cancels or no prompt is available.
    async fn obtain(&self, current_username: &str) -> Option<Credentials>;
}

/// Non-interactive provider with pre-supplied values
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    credentials: Credentials,
}

impl StaticCredentialProvider {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(username, password),
        }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn obtain(&self, _current_username: &str) -> Option<Credentials> {
        Some(self.credentials.clone())
    }
}

/// Provider that never answers, for strictly non-interactive runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

#[async_trait]
impl CredentialProvider for NoPrompt {
    async fn obtain(&self, _current_username: &str) -> Option<Credentials> {
        None
    }
}
