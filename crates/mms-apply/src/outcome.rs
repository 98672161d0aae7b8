//! Per-item and per-batch apply results
//!
//! The distinction between "skip this item" and "roll back everything" is
//! carried in these types instead of being implied by where an exception was
//! caught.

use mms_model::{ElementId, UpdateError, UpdateOutcome};

/// Why one item was skipped without aborting the batch
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    /// The target element is locked or read-only
    #[error("is not editable!")]
    NotEditable,

    /// The import payload has no entry for this element
    #[error("has no entry in the import payload!")]
    MissingPayload,

    /// The payload names a value kind this client does not support
    #[error("has unsupported value type {0}!")]
    UnknownKind(String),

    /// Wrong cardinality or un-coercible raw value
    #[error("{0}!")]
    Validation(#[from] UpdateError),
}

/// Result of applying one element's values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// The element was updated (or cleared)
    Applied(UpdateOutcome),
    /// The element was left untouched; the batch continued
    Skipped(SkipReason),
    /// An unexpected failure; the surrounding transaction was rolled back
    Failed,
}

impl ItemOutcome {
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }
}

/// Aggregated result of one batch apply
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    items: Vec<(ElementId, ItemOutcome)>,
    rolled_back: bool,
}

impl BatchOutcome {
    pub(crate) fn push(&mut self, id: ElementId, outcome: ItemOutcome) {
        self.items.push((id, outcome));
    }

    pub(crate) fn mark_rolled_back(&mut self) {
        self.rolled_back = true;
    }

    /// Per-item results in target order; on rollback, results up to and
    /// including the failing item
    #[must_use]
    pub fn items(&self) -> &[(ElementId, ItemOutcome)] {
        &self.items
    }

    /// Whether the whole transaction was cancelled
    ///
    /// When `true`, no mutation from this batch is visible, whatever the
    /// individual items report.
    #[inline]
    #[must_use]
    pub fn rolled_back(&self) -> bool {
        self.rolled_back
    }

    /// Number of items actually applied
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.items.iter().filter(|(_, o)| o.is_applied()).count()
    }

    /// Number of items skipped
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.items
            .iter()
            .filter(|(_, o)| matches!(o, ItemOutcome::Skipped(_)))
            .count()
    }
}
