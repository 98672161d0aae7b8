//! Local model capability for the MMS sync pipeline
//!
//! Provides the narrow surface the sync components are allowed to touch:
//! - Typed value kinds and literal value objects with identity
//! - Elements with an editable flag and one of two value-container styles
//! - A store with transactional sessions (commit or rollback as one unit)
//!
//! # Example
//!
//! ```rust,ignore
//! use mms_model::{Element, ModelStore, ValueKind};
//!
//! let store = ModelStore::new();
//! store.insert(Element::property("prop-1", "mass"));
//!
//! let mut session = store.create_session("Change values");
//! session.with_element_mut(&"prop-1".into(), |e| {
//!     e.update_value(ValueKind::Integer, &[serde_json::json!(5)])
//! })??;
//! session.close();
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod element;
pub mod error;
pub mod store;
pub mod value;

// Re-exports for convenience
pub use element::{Element, ElementId, UpdateOutcome, ValueContainer};
pub use error::{ModelError, UpdateError};
pub use store::{ModelStore, Session};
pub use value::{LiteralValue, ValueId, ValueKind, ValueObject};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
