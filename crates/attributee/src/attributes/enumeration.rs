use std::fmt;
use std::marker::PhantomData;

use super::Attribute;
use crate::context::Context;
use crate::error::{AttributeError, Result};
use crate::value::{kind_of, Value};

/// A closed set of named members.
///
/// Members are serialized by their declared name, never by position or
/// discriminant, so reordering the enum keeps existing files valid.
pub trait Enumerated: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Name of the enumeration, used in lookup errors.
    const ENUM_NAME: &'static str;

    fn members() -> &'static [Self];

    fn name(&self) -> &'static str;

    /// Case-sensitive lookup by declared name.
    fn from_name(name: &str) -> Option<Self> {
        Self::members().iter().find(|m| m.name() == name).cloned()
    }
}

/// Enumeration attribute keyed by member name.
pub struct Enumeration<E> {
    _members: PhantomData<fn() -> E>,
}

impl<E: Enumerated> Enumeration<E> {
    pub const fn new() -> Self {
        Self {
            _members: PhantomData,
        }
    }
}

impl<E: Enumerated> Default for Enumeration<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for Enumeration<E> {
    fn clone(&self) -> Self {
        Self {
            _members: PhantomData,
        }
    }
}

impl<E: Enumerated> fmt::Debug for Enumeration<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Enumeration<{}>", E::ENUM_NAME)
    }
}

impl<E: Enumerated> Attribute for Enumeration<E> {
    type Output = E;

    fn coerce(&self, raw: Value, _ctx: Context<'_>) -> Result<E> {
        match raw {
            Value::String(name) => {
                let name = name.trim();
                E::from_name(name).ok_or_else(|| AttributeError::Lookup {
                    enumeration: E::ENUM_NAME,
                    name: name.to_string(),
                })
            }
            other => Err(AttributeError::TypeMismatch {
                expected: "enumeration member name",
                found: kind_of(&other),
            }),
        }
    }

    fn dump(&self, value: &E) -> Result<Value> {
        Ok(Value::String(value.name().to_string()))
    }
}
