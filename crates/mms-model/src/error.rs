//! Error types for the local model capability

use crate::element::ElementId;
use crate::value::ValueKind;

/// Failures while touching the store inside a session.
///
/// These are unexpected from the apply pipeline's point of view: a target
/// element that vanished mid-transaction means the whole transaction must be
/// rolled back, not skipped.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// No element with this id in the store
    #[error("element not found: {0}")]
    NotFound(ElementId),
}

/// Validation failures for a value update
///
/// None of these mutate the target: a rejected update leaves the element
/// exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UpdateError {
    /// More than one value supplied for a single-valued target
    #[error("must have exactly one value but is being updated with {0}")]
    WrongCardinality(usize),

    /// The slot already holds more than one active value
    #[error("must have exactly one value to update, but there are {0}")]
    AmbiguousExisting(usize),

    /// The raw wire value cannot be read as the requested kind
    #[error("cannot read {raw} as a {kind}")]
    Incoercible {
        /// Requested value kind
        kind: ValueKind,
        /// Raw wire value, rendered as JSON
        raw: String,
    },
}
