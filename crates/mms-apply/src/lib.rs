//! Apply-transaction engine
//!
//! Takes a batch of remote-sourced values and applies them to local model
//! elements as one atomic, validated, rollback-safe local transaction:
//! - A non-editable or invalid target is a per-item skip, not an abort
//! - Any unexpected failure cancels the whole transaction; the caller is
//!   never left believing a partial apply succeeded
//! - Per-item results are explicit values, not control flow
//!
//! # Example
//!
//! ```rust,ignore
//! use mms_apply::ApplyEngine;
//! use mms_client::{ImportResult, TracingGuiLog};
//! use mms_model::ModelStore;
//! use std::sync::Arc;
//!
//! let engine = ApplyEngine::new(Arc::new(ModelStore::new()), Arc::new(TracingGuiLog));
//! let result = ImportResult::from_body(&response_body)?;
//! let outcome = engine.apply_batch(&result, &targets);
//! assert!(!outcome.rolled_back());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod engine;
pub mod outcome;

pub use engine::ApplyEngine;
pub use outcome::{BatchOutcome, ItemOutcome, SkipReason};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
