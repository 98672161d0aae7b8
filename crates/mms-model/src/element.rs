//! Model elements and their value containers

use crate::error::UpdateError;
use crate::value::{ValueId, ValueKind, ValueObject};
use serde_json::Value;
use std::fmt;

/// Identifier of a local model element, matching the remote element id
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(String);

impl ElementId {
    /// Wrap an id string
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw id string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// How an element stores its literal value(s)
#[derive(Debug, Clone, PartialEq)]
pub enum ValueContainer {
    /// Single-valued "default value" style property
    DefaultValue(Option<ValueObject>),
    /// Multi-valued slot, constrained to one active value
    Slot(Vec<ValueObject>),
}

/// Result of a successful value update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The value container was emptied
    Cleared,
    /// An existing value object was rewritten, identity preserved
    MutatedInPlace(ValueId),
    /// A new value object was installed, replacing whatever was there
    Replaced(ValueId),
}

/// A local model element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: ElementId,
    name: String,
    editable: bool,
    container: ValueContainer,
}

impl Element {
    /// New editable element with a default-value container
    #[must_use]
    pub fn property(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            editable: true,
            container: ValueContainer::DefaultValue(None),
        }
    }

    /// New editable element with a slot container
    #[must_use]
    pub fn slot(id: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            editable: true,
            container: ValueContainer::Slot(Vec::new()),
        }
    }

    /// Builder-style editability override
    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    /// Builder-style initial value
    #[must_use]
    pub fn with_value(mut self, value: ValueObject) -> Self {
        match &mut self.container {
            ValueContainer::DefaultValue(slot) => *slot = Some(value),
            ValueContainer::Slot(values) => values.push(value),
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Human-readable name for log lines; falls back to the id
    #[must_use]
    pub fn human_name(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }

    #[inline]
    #[must_use]
    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    #[inline]
    #[must_use]
    pub fn container(&self) -> &ValueContainer {
        &self.container
    }

    /// The single active value, if any
    #[must_use]
    pub fn current_value(&self) -> Option<&ValueObject> {
        match &self.container {
            ValueContainer::DefaultValue(slot) => slot.as_ref(),
            ValueContainer::Slot(values) => values.first(),
        }
    }

    /// Empty the value container
    pub fn clear_values(&mut self) {
        match &mut self.container {
            ValueContainer::DefaultValue(slot) => *slot = None,
            ValueContainer::Slot(values) => values.clear(),
        }
    }

    /// Apply a remote value list to this element (typed setter)
    ///
    /// - Empty list: clear the container.
    /// - Exactly one value: mutate a kind-compatible existing value object in
    ///   place (identity preserved), otherwise construct a replacement.
    /// - Anything else is a validation error and performs no mutation.
    ///
    /// # Errors
    /// [`UpdateError`] for wrong cardinality, an ambiguous pre-existing slot
    /// state, or a raw value that cannot be coerced. The element is unchanged
    /// on error.
    pub fn update_value(
        &mut self,
        kind: ValueKind,
        values: &[Value],
    ) -> Result<UpdateOutcome, UpdateError> {
        if values.is_empty() {
            self.clear_values();
            return Ok(UpdateOutcome::Cleared);
        }
        if values.len() != 1 {
            return Err(UpdateError::WrongCardinality(values.len()));
        }
        let raw = &values[0];

        match &mut self.container {
            ValueContainer::DefaultValue(slot) => {
                if let Some(existing) = slot {
                    if kind.accepts_in_place(existing.kind()) {
                        existing.write(kind, raw)?;
                        return Ok(UpdateOutcome::MutatedInPlace(existing.id()));
                    }
                }
                // construct before installing so a coercion error mutates nothing
                let fresh = ValueObject::new(kind.construct(raw)?);
                let id = fresh.id();
                *slot = Some(fresh);
                Ok(UpdateOutcome::Replaced(id))
            }
            ValueContainer::Slot(existing) => {
                if existing.len() > 1 {
                    return Err(UpdateError::AmbiguousExisting(existing.len()));
                }
                if let Some(candidate) = existing
                    .iter_mut()
                    .find(|v| kind.accepts_in_place(v.kind()))
                {
                    candidate.write(kind, raw)?;
                    return Ok(UpdateOutcome::MutatedInPlace(candidate.id()));
                }
                let fresh = ValueObject::new(kind.construct(raw)?);
                let id = fresh.id();
                existing.clear();
                existing.push(fresh);
                Ok(UpdateOutcome::Replaced(id))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::LiteralValue;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_list_clears_existing_value() {
        let mut element = Element::property("p1", "mass")
            .with_value(ValueObject::new(LiteralValue::Integer(3)));
        let outcome = element.update_value(ValueKind::Integer, &[]).unwrap();
        assert_eq!(outcome, UpdateOutcome::Cleared);
        assert!(element.current_value().is_none());
    }

    #[test]
    fn single_value_on_empty_container_creates() {
        let mut element = Element::property("p1", "mass");
        let outcome = element.update_value(ValueKind::Integer, &[json!(5)]).unwrap();
        assert!(matches!(outcome, UpdateOutcome::Replaced(_)));
        assert_eq!(
            element.current_value().unwrap().literal(),
            &LiteralValue::Integer(5)
        );
    }

    #[test]
    fn compatible_existing_value_is_mutated_in_place() {
        let mut element = Element::property("p1", "mass")
            .with_value(ValueObject::new(LiteralValue::Integer(3)));
        let before = element.current_value().unwrap().id();

        let outcome = element.update_value(ValueKind::Integer, &[json!(5)]).unwrap();

        assert_eq!(outcome, UpdateOutcome::MutatedInPlace(before));
        let after = element.current_value().unwrap();
        assert_eq!(after.id(), before);
        assert_eq!(after.literal(), &LiteralValue::Integer(5));
    }

    #[test]
    fn unlimited_natural_target_reuses_integer_object() {
        let mut element = Element::property("p1", "multiplicity")
            .with_value(ValueObject::new(LiteralValue::Integer(1)));
        let before = element.current_value().unwrap().id();

        let outcome = element
            .update_value(ValueKind::UnlimitedNatural, &[json!(4)])
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::MutatedInPlace(before));
        // held kind is preserved, only the number changed
        assert_eq!(
            element.current_value().unwrap().literal(),
            &LiteralValue::Integer(4)
        );
    }

    #[test]
    fn incompatible_existing_value_is_replaced() {
        let mut element = Element::property("p1", "label")
            .with_value(ValueObject::new(LiteralValue::String("old".into())));
        let before = element.current_value().unwrap().id();

        let outcome = element.update_value(ValueKind::Integer, &[json!(2)]).unwrap();

        let after = element.current_value().unwrap();
        assert!(matches!(outcome, UpdateOutcome::Replaced(id) if id == after.id()));
        assert_ne!(after.id(), before);
        assert_eq!(after.literal(), &LiteralValue::Integer(2));
    }

    #[test]
    fn two_values_on_single_valued_target_mutate_nothing() {
        let mut element = Element::property("p1", "mass")
            .with_value(ValueObject::new(LiteralValue::Integer(3)));
        let err = element
            .update_value(ValueKind::Integer, &[json!(1), json!(2)])
            .unwrap_err();
        assert_eq!(err, UpdateError::WrongCardinality(2));
        assert_eq!(
            element.current_value().unwrap().literal(),
            &LiteralValue::Integer(3)
        );
    }

    #[test]
    fn overfull_slot_rejects_update() {
        let mut element = Element::slot("s1", "tag")
            .with_value(ValueObject::new(LiteralValue::Integer(1)))
            .with_value(ValueObject::new(LiteralValue::Integer(2)));
        let err = element
            .update_value(ValueKind::Integer, &[json!(9)])
            .unwrap_err();
        assert_eq!(err, UpdateError::AmbiguousExisting(2));
    }

    #[test]
    fn slot_scans_for_compatible_candidate() {
        let mut element = Element::slot("s1", "tag")
            .with_value(ValueObject::new(LiteralValue::Boolean(false)));
        let before = element.current_value().unwrap().id();

        let outcome = element
            .update_value(ValueKind::Boolean, &[json!(true)])
            .unwrap();

        assert_eq!(outcome, UpdateOutcome::MutatedInPlace(before));
        assert_eq!(
            element.current_value().unwrap().literal(),
            &LiteralValue::Boolean(true)
        );
    }

    #[test]
    fn coercion_failure_leaves_element_unchanged() {
        let mut element = Element::property("p1", "mass")
            .with_value(ValueObject::new(LiteralValue::String("old".into())));
        let err = element
            .update_value(ValueKind::Integer, &[json!("five")])
            .unwrap_err();
        assert!(matches!(err, UpdateError::Incoercible { .. }));
        assert_eq!(
            element.current_value().unwrap().literal(),
            &LiteralValue::String("old".into())
        );
    }
}
