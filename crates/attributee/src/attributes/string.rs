use std::fmt;
use std::sync::Arc;

use super::Attribute;
use crate::context::Context;
use crate::error::Result;
use crate::value::Value;

/// Post-processing applied to a stringified value, e.g. resolving a relative
/// path against a base directory carried by the context.
pub type Transformer = Arc<dyn Fn(String, Context<'_>) -> Result<String> + Send + Sync>;

/// String attribute with an optional context-aware transformer.
///
/// Null stays `None`. Anything else is stringified (scalars by their literal
/// text, lists and mappings as compact JSON) and then passed through the
/// transformer, whose errors propagate unchanged.
#[derive(Clone, Default)]
pub struct Str {
    transformer: Option<Transformer>,
}

impl Str {
    pub fn new() -> Self {
        Self { transformer: None }
    }

    pub fn with_transformer<F>(transformer: F) -> Self
    where
        F: Fn(String, Context<'_>) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            transformer: Some(Arc::new(transformer)),
        }
    }

    pub fn has_transformer(&self) -> bool {
        self.transformer.is_some()
    }
}

impl fmt::Debug for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Str")
            .field("transformer", &self.transformer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

fn stringify(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Attribute for Str {
    type Output = Option<String>;

    fn coerce(&self, raw: Value, ctx: Context<'_>) -> Result<Option<String>> {
        if raw.is_null() {
            return Ok(None);
        }
        let text = stringify(raw);
        match &self.transformer {
            Some(transform) => transform(text, ctx).map(Some),
            None => Ok(Some(text)),
        }
    }

    fn dump(&self, value: &Option<String>) -> Result<Value> {
        Ok(value.clone().map(Value::String).unwrap_or(Value::Null))
    }
}
