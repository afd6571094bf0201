use super::Attribute;
use crate::context::Context;
use crate::error::{AttributeError, Result};
use crate::value::{kind_of, Value};

/// A scalar accepted verbatim by [`Primitive`].
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    /// Integers above `i64::MAX`.
    Unsigned(u64),
    Float(f64),
    Boolean(bool),
}

impl From<Scalar> for Value {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::String(s) => Value::String(s),
            Scalar::Integer(i) => Value::from(i),
            Scalar::Unsigned(u) => Value::from(u),
            Scalar::Float(f) => Value::from(f),
            Scalar::Boolean(b) => Value::Bool(b),
        }
    }
}

/// Passthrough attribute for strings, integers, floats, and booleans.
#[derive(Debug, Clone, Copy, Default)]
pub struct Primitive;

impl Primitive {
    pub const fn new() -> Self {
        Primitive
    }
}

impl Attribute for Primitive {
    type Output = Scalar;

    fn coerce(&self, raw: Value, _ctx: Context<'_>) -> Result<Scalar> {
        match raw {
            Value::String(s) => Ok(Scalar::String(s)),
            Value::Bool(b) => Ok(Scalar::Boolean(b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Scalar::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Ok(Scalar::Unsigned(u))
                } else {
                    n.as_f64().map(Scalar::Float).ok_or_else(|| {
                        AttributeError::Conversion(format!("unrepresentable number {}", n))
                    })
                }
            }
            other => Err(AttributeError::TypeMismatch {
                expected: "string, integer, float or boolean",
                found: kind_of(&other),
            }),
        }
    }

    fn dump(&self, value: &Scalar) -> Result<Value> {
        if let Scalar::Float(f) = value {
            if !f.is_finite() {
                return Err(AttributeError::Conversion(format!("{} cannot be dumped", f)));
            }
        }
        Ok(value.clone().into())
    }
}
