//! Error types for the MMS client

use crate::http::TransportError;

/// Client-level errors
///
/// Most failures in this crate are absorbed at the component boundary and
/// surfaced as log lines; this type covers the few that a caller can act on.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The network call itself failed
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// A service URL could not be built from the configuration
    #[error("cannot build service url: {0}")]
    UrlBuild(String),
}

impl ClientError {
    /// Whether this error is a transient transport condition
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
