//! Client configuration

use crate::error::ClientError;
use std::time::Duration;

/// Default interval between ticket renewal checks
pub const DEFAULT_RENEWAL_INTERVAL: Duration = Duration::from_secs(60);

/// Default per-request timeout for the production transport
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for one MMS connection
///
/// `popups_disabled` is the automation switch: with it set, nothing in the
/// pipeline will ever wait for an interactive credential prompt.
#[derive(Debug, Clone)]
pub struct MmsConfig {
    base_url: String,
    popups_disabled: bool,
    renewal_interval: Duration,
    request_timeout: Duration,
}

impl MmsConfig {
    /// New configuration for the given base service URL
    /// (e.g. `https://host/alfresco/service`)
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            popups_disabled: false,
            renewal_interval: DEFAULT_RENEWAL_INTERVAL,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Disable interactive credential prompts (automation mode)
    #[must_use]
    pub fn with_popups_disabled(mut self, disabled: bool) -> Self {
        self.popups_disabled = disabled;
        self
    }

    /// Override the renewal check interval
    #[must_use]
    pub fn with_renewal_interval(mut self, interval: Duration) -> Self {
        self.renewal_interval = interval;
        self
    }

    /// Override the per-request timeout
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[inline]
    #[must_use]
    pub fn popups_disabled(&self) -> bool {
        self.popups_disabled
    }

    #[inline]
    #[must_use]
    pub fn renewal_interval(&self) -> Duration {
        self.renewal_interval
    }

    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// The configured base service URL
    ///
    /// # Errors
    /// `ClientError::UrlBuild` when no base URL is configured, e.g. no active
    /// project. Callers decide whether that fails open or closed.
    pub fn service_url(&self) -> Result<&str, ClientError> {
        if self.base_url.is_empty() {
            return Err(ClientError::UrlBuild(
                "no base service url configured".to_owned(),
            ));
        }
        Ok(&self.base_url)
    }

    /// URL of the login endpoint
    ///
    /// # Errors
    /// See [`MmsConfig::service_url`].
    pub fn login_url(&self) -> Result<String, ClientError> {
        Ok(format!("{}/api/login", self.service_url()?))
    }

    /// URL of the ticket-status endpoint for `ticket`
    ///
    /// # Errors
    /// See [`MmsConfig::service_url`].
    pub fn ticket_url(&self, ticket: &str) -> Result<String, ClientError> {
        Ok(format!("{}/mms/login/ticket/{ticket}", self.service_url()?))
    }
}
