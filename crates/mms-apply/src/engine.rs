//! The apply engine

use crate::outcome::{BatchOutcome, ItemOutcome, SkipReason};
use mms_client::{GuiLog, ImportResult};
use mms_model::{ElementId, ModelError, ModelStore, Session, ValueKind};
use serde_json::Value;
use std::sync::Arc;

/// Applies remote values to local elements as atomic transactions
///
/// The engine is the sole mutator of targeted elements while one of its
/// sessions is open; that single-writer discipline is what makes the
/// session's snapshot rollback sound.
pub struct ApplyEngine {
    store: Arc<ModelStore>,
    gui: Arc<dyn GuiLog>,
}

impl std::fmt::Debug for ApplyEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplyEngine")
            .field("elements", &self.store.len())
            .finish_non_exhaustive()
    }
}

impl ApplyEngine {
    #[must_use]
    pub fn new(store: Arc<ModelStore>, gui: Arc<dyn GuiLog>) -> Self {
        Self { store, gui }
    }

    /// Apply a batch of remote values as one local transaction
    ///
    /// Each target is looked up in the payload's `elementsKeyed` map by id.
    /// Non-editable and invalid targets are skipped with a log line and the
    /// batch continues; an unexpected failure cancels the whole transaction,
    /// is logged once, and is not propagated.
    #[must_use]
    pub fn apply_batch(&self, result: &ImportResult, targets: &[ElementId]) -> BatchOutcome {
        let mut session = self.store.create_session("Change values");
        let mut outcome = BatchOutcome::default();

        for id in targets {
            match self.apply_keyed(&mut session, id, result) {
                Ok(item) => outcome.push(id.clone(), item),
                Err(e) => {
                    self.gui.error(&format!(
                        "Import of remote values failed unexpectedly. Reason: {e}"
                    ));
                    outcome.push(id.clone(), ItemOutcome::Failed);
                    outcome.mark_rolled_back();
                    session.cancel();
                    return outcome;
                }
            }
        }

        session.close();
        tracing::debug!(
            applied = outcome.applied_count(),
            skipped = outcome.skipped_count(),
            "batch apply committed"
        );
        outcome
    }

    /// Apply one explicit value list to one element, in its own transaction
    ///
    /// Used by the interactive single-target path. Validation and
    /// editability errors abort just this call, leaving the element
    /// untouched; unexpected failures roll back and report
    /// [`ItemOutcome::Failed`].
    #[must_use]
    pub fn apply_single(
        &self,
        id: &ElementId,
        kind: ValueKind,
        values: &[Value],
    ) -> ItemOutcome {
        let mut session = self.store.create_session("Change value");
        match self.apply_values(&mut session, id, kind, values) {
            Ok(item) => {
                session.close();
                item
            }
            Err(e) => {
                self.gui.error(&format!(
                    "Import of remote values failed unexpectedly. Reason: {e}"
                ));
                session.cancel();
                ItemOutcome::Failed
            }
        }
    }

    /// One batch item: resolve the payload entry, then apply
    fn apply_keyed(
        &self,
        session: &mut Session<'_>,
        id: &ElementId,
        result: &ImportResult,
    ) -> Result<ItemOutcome, ModelError> {
        // editability is decided before the payload is even consulted
        let (editable, human) =
            session.with_element(id, |e| (e.is_editable(), e.human_name().to_owned()))?;
        if !editable {
            let reason = SkipReason::NotEditable;
            self.gui.error(&format!("{human} {reason}"));
            return Ok(ItemOutcome::Skipped(reason));
        }

        let Some(keyed) = result.keyed(id.as_str()) else {
            let reason = SkipReason::MissingPayload;
            self.gui.error(&format!("{human} {reason}"));
            return Ok(ItemOutcome::Skipped(reason));
        };
        let Some(kind) = ValueKind::from_wire(&keyed.value_type) else {
            let reason = SkipReason::UnknownKind(keyed.value_type.clone());
            self.gui.error(&format!("{human} {reason}"));
            return Ok(ItemOutcome::Skipped(reason));
        };

        self.apply_values(session, id, kind, &keyed.value)
    }

    /// Typed-setter path shared by the batch and single-element APIs
    fn apply_values(
        &self,
        session: &mut Session<'_>,
        id: &ElementId,
        kind: ValueKind,
        values: &[Value],
    ) -> Result<ItemOutcome, ModelError> {
        let (editable, human) =
            session.with_element(id, |e| (e.is_editable(), e.human_name().to_owned()))?;
        if !editable {
            let reason = SkipReason::NotEditable;
            self.gui.error(&format!("{human} {reason}"));
            return Ok(ItemOutcome::Skipped(reason));
        }

        let update = session.with_element_mut(id, |e| e.update_value(kind, values))?;
        match update {
            Ok(applied) => Ok(ItemOutcome::Applied(applied)),
            Err(validation) => {
                let reason = SkipReason::Validation(validation);
                self.gui.error(&format!("{human} {reason}"));
                Ok(ItemOutcome::Skipped(reason))
            }
        }
    }
}
