//! Wire values and attribute inputs.
//!
//! Wire values are plain `serde_json` values. The crate enables
//! `serde_json/preserve_order`, so [`Mapping`] keeps keys in insertion order
//! all the way from `dump()` to the encoded file and back.

pub use serde_json::Value;

/// Order-preserving mapping of attribute name to wire value.
pub type Mapping = serde_json::Map<String, Value>;

/// Input handed to an attribute: either raw wire data or a value that was
/// already coerced by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Input<T> {
    /// Untyped external data that must go through `coerce`.
    Raw(Value),
    /// A value of the attribute's own type, accepted as-is.
    Coerced(T),
}

impl<T> Input<T> {
    pub fn raw(value: impl Into<Value>) -> Self {
        Input::Raw(value.into())
    }

    pub fn coerced(value: T) -> Self {
        Input::Coerced(value)
    }
}

impl<T> From<Value> for Input<T> {
    fn from(value: Value) -> Self {
        Input::Raw(value)
    }
}

/// Human-readable kind of a wire value, used in type mismatch errors.
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "mapping",
    }
}
