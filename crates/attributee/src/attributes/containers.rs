use indexmap::IndexMap;

use super::Attribute;
use crate::context::Context;
use crate::error::{AttributeError, Result};
use crate::value::{kind_of, Mapping, Value};

/// Homogeneous list coerced element-wise by an inner attribute.
///
/// With a separator configured, a string input is split into items first,
/// so `"a,b,c"` and `["a", "b", "c"]` are equivalent.
#[derive(Debug, Clone, Default)]
pub struct List<A> {
    inner: A,
    separator: Option<String>,
}

impl<A: Attribute> List<A> {
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            separator: None,
        }
    }

    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Attribute> Attribute for List<A> {
    type Output = Vec<A::Output>;

    fn coerce(&self, raw: Value, ctx: Context<'_>) -> Result<Self::Output> {
        let items = match (raw, &self.separator) {
            (Value::Array(items), _) => items,
            (Value::String(text), Some(separator)) => text
                .split(separator.as_str())
                .map(|part| Value::String(part.to_string()))
                .collect(),
            (other, _) => {
                return Err(AttributeError::TypeMismatch {
                    expected: "list",
                    found: kind_of(&other),
                })
            }
        };
        items
            .into_iter()
            .map(|item| self.inner.coerce(item, ctx))
            .collect()
    }

    fn dump(&self, value: &Self::Output) -> Result<Value> {
        value
            .iter()
            .map(|item| self.inner.dump(item))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array)
    }
}

/// String-keyed mapping whose values are coerced by an inner attribute.
/// Key order is preserved in both directions.
#[derive(Debug, Clone, Default)]
pub struct Map<A> {
    inner: A,
}

impl<A: Attribute> Map<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

impl<A: Attribute> Attribute for Map<A> {
    type Output = IndexMap<String, A::Output>;

    fn coerce(&self, raw: Value, ctx: Context<'_>) -> Result<Self::Output> {
        let entries = match raw {
            Value::Object(entries) => entries,
            other => {
                return Err(AttributeError::TypeMismatch {
                    expected: "mapping",
                    found: kind_of(&other),
                })
            }
        };
        let mut out = IndexMap::with_capacity(entries.len());
        for (key, item) in entries {
            let coerced = self.inner.coerce(item, ctx)?;
            out.insert(key, coerced);
        }
        Ok(out)
    }

    fn dump(&self, value: &Self::Output) -> Result<Value> {
        let mut out = Mapping::new();
        for (key, item) in value {
            out.insert(key.clone(), self.inner.dump(item)?);
        }
        Ok(Value::Object(out))
    }
}
