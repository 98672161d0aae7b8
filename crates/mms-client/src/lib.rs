//! MMS client - authenticated synchronization transport
//!
//! Moves data reliably between the local model and a remote model management
//! system (MMS) server:
//! - Holds a renewable authentication ticket ([`TicketManager`])
//! - Delivers outbound requests in submission order, off the interactive
//!   thread ([`RequestQueue`])
//! - Wraps both in an injectable per-process session context
//!   ([`SyncContext`])
//!
//! # Example
//!
//! ```rust,ignore
//! use mms_client::{MmsConfig, Request, StaticCredentialProvider, SyncContext, TracingGuiLog};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MmsConfig::new("https://mms.example.com/alfresco/service");
//! let provider = StaticCredentialProvider::new("alice", "secret");
//! let context = SyncContext::with_reqwest(config, Arc::new(provider), Arc::new(TracingGuiLog))?;
//!
//! context.ticket_manager().login().await;
//! context.offer(Request::post(
//!     "https://mms.example.com/alfresco/service/workspaces/master/elements",
//!     serde_json::json!({"elements": [], "source": "magicdraw"}),
//! ));
//! context.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod context;
pub mod credentials;
pub mod error;
pub mod http;
pub mod log;
pub mod queue;
pub mod ticket;
pub mod wire;

// Re-exports for convenience
pub use config::MmsConfig;
pub use context::SyncContext;
pub use credentials::{
    CredentialProvider, CredentialStore, Credentials, NoPrompt, StaticCredentialProvider,
};
pub use error::ClientError;
pub use http::{HttpResponse, HttpTransport, Method, Request, ReqwestTransport, TransportError};
pub use log::{GuiLog, RecordingGuiLog, TracingGuiLog};
pub use queue::{DispatchStats, RequestQueue};
pub use ticket::TicketManager;
pub use wire::{ElementPayload, ExportBody, ImportResult, KeyedValue};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
