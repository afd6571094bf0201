//! Opaque coercion context.
//!
//! A [`Context`] carries whatever scope the caller wants nested coercion to
//! see (a base directory, a parent object, a settings struct). Attributes never
//! look inside it; they hand it unchanged to transformers, resolvers, and
//! nested constructors, which recover the concrete type with [`Context::get`].

use std::any::Any;
use std::fmt;

#[derive(Clone, Copy, Default)]
pub struct Context<'a> {
    scope: Option<&'a (dyn Any + Send + Sync)>,
}

impl<'a> Context<'a> {
    /// A context carrying nothing.
    pub const fn empty() -> Self {
        Self { scope: None }
    }

    pub fn new<T: Any + Send + Sync>(scope: &'a T) -> Self {
        Self { scope: Some(scope) }
    }

    /// Borrow the scope value if it is a `T`.
    pub fn get<T: Any>(&self) -> Option<&'a T> {
        self.scope.and_then(|scope| scope.downcast_ref::<T>())
    }

    pub fn is_empty(&self) -> bool {
        self.scope.is_none()
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("scope", &self.scope.map(|_| "<opaque>"))
            .finish()
    }
}
