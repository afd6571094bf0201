use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::Attribute;
use crate::context::Context;
use crate::error::{AttributeError, Result};
use crate::registry::{self, FunctionRegistry};
use crate::value::{kind_of, Value};

/// A reference to a registered function or constructor.
///
/// The target is type-erased; callers recover it with [`FunctionRef::get`]
/// using the concrete type it was registered with (typically a `fn` pointer).
#[derive(Clone)]
pub struct FunctionRef {
    canonical: String,
    resname: Option<String>,
    target: Arc<dyn Any + Send + Sync>,
}

impl FunctionRef {
    pub fn new<F: Any + Send + Sync>(canonical: impl Into<String>, target: F) -> Self {
        Self {
            canonical: canonical.into(),
            resname: None,
            target: Arc::new(target),
        }
    }

    /// The name the target was registered under.
    pub fn canonical_name(&self) -> &str {
        &self.canonical
    }

    /// The exact string this reference was resolved from, if any.
    pub fn resname(&self) -> Option<&str> {
        self.resname.as_deref()
    }

    pub fn with_resname(mut self, resname: impl Into<String>) -> Self {
        self.resname = Some(resname.into());
        self
    }

    pub fn get<F: Any>(&self) -> Option<&F> {
        self.target.downcast_ref::<F>()
    }

    /// Name written on dump: the original string when tagged, else the canonical name.
    pub fn wire_name(&self) -> &str {
        self.resname.as_deref().unwrap_or(&self.canonical)
    }
}

impl PartialEq for FunctionRef {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
            && std::ptr::addr_eq(Arc::as_ptr(&self.target), Arc::as_ptr(&other.target))
    }
}

impl fmt::Debug for FunctionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRef")
            .field("canonical", &self.canonical)
            .field("resname", &self.resname)
            .finish_non_exhaustive()
    }
}

/// Attribute whose value is a function reference, written as its registered name.
#[derive(Debug, Clone, Default)]
pub struct Callable {
    registry: Option<Arc<FunctionRegistry>>,
}

impl Callable {
    /// Resolve names through the global function registry.
    pub fn new() -> Self {
        Self { registry: None }
    }

    pub fn with_registry(registry: Arc<FunctionRegistry>) -> Self {
        Self {
            registry: Some(registry),
        }
    }

    fn registry(&self) -> &FunctionRegistry {
        match &self.registry {
            Some(registry) => registry,
            None => registry::functions(),
        }
    }
}

impl Attribute for Callable {
    type Output = FunctionRef;

    fn coerce(&self, raw: Value, _ctx: Context<'_>) -> Result<FunctionRef> {
        match raw {
            Value::String(name) => {
                let target = self.registry().resolve(&name)?;
                Ok(target.with_resname(name))
            }
            other => Err(AttributeError::TypeMismatch {
                expected: "function name",
                found: kind_of(&other),
            }),
        }
    }

    fn dump(&self, value: &FunctionRef) -> Result<Value> {
        Ok(Value::String(value.wire_name().to_string()))
    }
}
