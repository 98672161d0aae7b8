//! Value kinds and literal value objects
//!
//! A model property's literal value is a tagged [`LiteralValue`] wrapped in a
//! [`ValueObject`] carrying identity. Remote updates prefer mutating an
//! existing object in place over replacing it, so cross-references held
//! elsewhere in the model stay intact.

use crate::element::ElementId;
use crate::error::UpdateError;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// Tagged type of a model property's literal value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Literal string
    String,
    /// Literal integer
    Integer,
    /// Literal boolean
    Boolean,
    /// Literal unlimited natural (non-negative)
    UnlimitedNatural,
    /// Literal real
    Real,
    /// Reference to another model element
    ElementReference,
}

impl ValueKind {
    /// Parse the wire name used in `valueType` fields
    #[must_use]
    pub fn from_wire(name: &str) -> Option<Self> {
        Some(match name {
            "LiteralString" => Self::String,
            "LiteralInteger" => Self::Integer,
            "LiteralBoolean" => Self::Boolean,
            "LiteralUnlimitedNatural" => Self::UnlimitedNatural,
            "LiteralReal" => Self::Real,
            "ElementValue" => Self::ElementReference,
            _ => return None,
        })
    }

    /// Wire name for this kind
    #[must_use]
    pub fn wire_name(self) -> &'static str {
        match self {
            Self::String => "LiteralString",
            Self::Integer => "LiteralInteger",
            Self::Boolean => "LiteralBoolean",
            Self::UnlimitedNatural => "LiteralUnlimitedNatural",
            Self::Real => "LiteralReal",
            Self::ElementReference => "ElementValue",
        }
    }

    /// Whether an existing value object of `existing` kind may be updated in
    /// place to satisfy a target of this kind.
    ///
    /// An `UnlimitedNatural` target is satisfied in place by either an
    /// `Integer` or an `UnlimitedNatural` object; every other pair requires
    /// an exact kind match.
    #[must_use]
    pub fn accepts_in_place(self, existing: ValueKind) -> bool {
        match self {
            Self::UnlimitedNatural => {
                matches!(existing, Self::Integer | Self::UnlimitedNatural)
            }
            other => existing == other,
        }
    }

    /// Construct a fresh literal of this kind from a raw wire value
    ///
    /// # Errors
    /// `UpdateError::Incoercible` if the raw value has the wrong JSON shape
    /// (including a negative number for `UnlimitedNatural`).
    pub fn construct(self, raw: &Value) -> Result<LiteralValue, UpdateError> {
        let incoercible = || UpdateError::Incoercible {
            kind: self,
            raw: raw.to_string(),
        };
        Ok(match self {
            Self::String => {
                LiteralValue::String(raw.as_str().ok_or_else(incoercible)?.to_owned())
            }
            Self::Integer => LiteralValue::Integer(raw.as_i64().ok_or_else(incoercible)?),
            Self::Boolean => LiteralValue::Boolean(raw.as_bool().ok_or_else(incoercible)?),
            Self::UnlimitedNatural => {
                LiteralValue::UnlimitedNatural(raw.as_u64().ok_or_else(incoercible)?)
            }
            Self::Real => LiteralValue::Real(raw.as_f64().ok_or_else(incoercible)?),
            Self::ElementReference => LiteralValue::ElementRef(ElementId::new(
                raw.as_str().ok_or_else(incoercible)?,
            )),
        })
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// A tagged literal value
#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    String(String),
    Integer(i64),
    Boolean(bool),
    UnlimitedNatural(u64),
    Real(f64),
    ElementRef(ElementId),
}

impl LiteralValue {
    /// Kind tag of this literal
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::String(_) => ValueKind::String,
            Self::Integer(_) => ValueKind::Integer,
            Self::Boolean(_) => ValueKind::Boolean,
            Self::UnlimitedNatural(_) => ValueKind::UnlimitedNatural,
            Self::Real(_) => ValueKind::Real,
            Self::ElementRef(_) => ValueKind::ElementReference,
        }
    }
}

/// Identity of a value object, stable across in-place mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValueId(Uuid);

impl ValueId {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ValueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A literal value with identity
///
/// In-place mutation keeps the id; replacement mints a new one. This is the
/// observable form of "non-destructive update when possible".
#[derive(Debug, Clone, PartialEq)]
pub struct ValueObject {
    id: ValueId,
    literal: LiteralValue,
}

impl ValueObject {
    /// Wrap a literal in a fresh identity
    #[must_use]
    pub fn new(literal: LiteralValue) -> Self {
        Self {
            id: ValueId::new(),
            literal,
        }
    }

    /// Identity of this value object
    #[inline]
    #[must_use]
    pub fn id(&self) -> ValueId {
        self.id
    }

    /// Kind tag of the held literal
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        self.literal.kind()
    }

    /// The held literal
    #[inline]
    #[must_use]
    pub fn literal(&self) -> &LiteralValue {
        &self.literal
    }

    /// Overwrite the held literal from a raw wire value, keeping identity.
    ///
    /// Coercion follows the kind already held, so an `Integer` object serving
    /// an `UnlimitedNatural` target stays an `Integer`. Either the whole
    /// write succeeds or the object is left untouched.
    ///
    /// # Errors
    /// `UpdateError::Incoercible` if the raw value does not fit the held kind;
    /// `target` only flavors the error message.
    pub fn write(&mut self, target: ValueKind, raw: &Value) -> Result<(), UpdateError> {
        let incoercible = || UpdateError::Incoercible {
            kind: target,
            raw: raw.to_string(),
        };
        match &mut self.literal {
            LiteralValue::String(s) => *s = raw.as_str().ok_or_else(incoercible)?.to_owned(),
            LiteralValue::Integer(i) => *i = raw.as_i64().ok_or_else(incoercible)?,
            LiteralValue::Boolean(b) => *b = raw.as_bool().ok_or_else(incoercible)?,
            LiteralValue::UnlimitedNatural(n) => *n = raw.as_u64().ok_or_else(incoercible)?,
            LiteralValue::Real(r) => *r = raw.as_f64().ok_or_else(incoercible)?,
            LiteralValue::ElementRef(e) => {
                *e = ElementId::new(raw.as_str().ok_or_else(incoercible)?);
            }
        }
        Ok(())
    }
}
