use super::Attribute;
use crate::context::Context;
use crate::error::Result;
use crate::value::Value;

const TRUE_WORDS: &[&str] = &["true", "1", "t", "y", "yes"];

/// Logical attribute.
///
/// Strings are true only when they match one of `true`, `1`, `t`, `y`, `yes`
/// (case-insensitive); every other string is false. Other values follow the
/// usual truthiness: null is false, numbers are true when non-zero, lists and
/// mappings are true when non-empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Boolean {
    pub const fn new() -> Self {
        Boolean
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let lowered = s.to_lowercase();
            TRUE_WORDS.contains(&lowered.as_str())
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

impl Attribute for Boolean {
    type Output = bool;

    fn coerce(&self, raw: Value, _ctx: Context<'_>) -> Result<bool> {
        Ok(truthy(&raw))
    }

    fn dump(&self, value: &bool) -> Result<Value> {
        Ok(Value::Bool(*value))
    }
}
