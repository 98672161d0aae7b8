//! In-memory model store with transactional sessions
//!
//! Mutations happen only inside an open [`Session`]. Cancelling a session
//! restores the snapshot taken when it was opened; dropping one without
//! closing does the same, so an unwinding caller can never leave a partial
//! apply behind. The apply engine is the sole mutator while a session is
//! open (single writer), which is what makes a whole-map snapshot a
//! sufficient rollback mechanism.

use crate::element::{Element, ElementId};
use crate::error::ModelError;
use dashmap::DashMap;
use std::collections::HashMap;

/// Concurrent map of model elements
#[derive(Debug, Default)]
pub struct ModelStore {
    elements: DashMap<ElementId, Element>,
}

impl ModelStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an element
    pub fn insert(&self, element: Element) {
        self.elements.insert(element.id().clone(), element);
    }

    /// Snapshot copy of one element
    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<Element> {
        self.elements.get(id).map(|e| e.value().clone())
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Open a transactional session
    ///
    /// The label names the edit the way the host application would show it in
    /// an undo history ("Change values").
    #[must_use]
    pub fn create_session(&self, label: &str) -> Session<'_> {
        let snapshot = self
            .elements
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        Session {
            store: self,
            label: label.to_owned(),
            snapshot,
            finished: false,
        }
    }
}

/// A scoped unit of local-model mutation
///
/// Closed (commit) or cancelled (rollback) exactly once; dropping an open
/// session cancels it.
#[derive(Debug)]
pub struct Session<'a> {
    store: &'a ModelStore,
    label: String,
    snapshot: HashMap<ElementId, Element>,
    finished: bool,
}

impl Session<'_> {
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Read access to one element
    ///
    /// # Errors
    /// `ModelError::NotFound` if no such element exists.
    pub fn with_element<R>(
        &self,
        id: &ElementId,
        f: impl FnOnce(&Element) -> R,
    ) -> Result<R, ModelError> {
        self.store
            .elements
            .get(id)
            .map(|e| f(e.value()))
            .ok_or_else(|| ModelError::NotFound(id.clone()))
    }

    /// Mutable access to one element
    ///
    /// # Errors
    /// `ModelError::NotFound` if no such element exists.
    pub fn with_element_mut<R>(
        &mut self,
        id: &ElementId,
        f: impl FnOnce(&mut Element) -> R,
    ) -> Result<R, ModelError> {
        self.store
            .elements
            .get_mut(id)
            .map(|mut e| f(e.value_mut()))
            .ok_or_else(|| ModelError::NotFound(id.clone()))
    }

    /// Commit: keep every mutation made inside the session
    pub fn close(mut self) {
        self.finished = true;
    }

    /// Rollback: restore the store to its state at session open
    pub fn cancel(mut self) {
        self.rollback();
    }

    fn rollback(&mut self) {
        self.finished = true;
        self.store.elements.clear();
        for (id, element) in self.snapshot.drain() {
            self.store.elements.insert(id, element);
        }
    }
}

impl Drop for Session<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.rollback();
        }
    }
}
