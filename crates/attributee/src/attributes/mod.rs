//! # Attribute System
//!
//! An attribute is a typed schema slot with two operations: `coerce` turns raw
//! wire data into the declared Rust type, and `dump` turns it back into a wire
//! value. Attributes hold only their declaration-time configuration, so one
//! declaration (often a `static`) serves every instance of its owner.
//!
//! ## Attribute Types
//!
//! | Attribute | Output | Wire form |
//! |-----------|--------|-----------|
//! | [`Primitive`] | [`Scalar`] | string, integer, float, or boolean |
//! | [`Integer`] / [`Float`] | `i64` / `f64` | number, bounds checked |
//! | [`Boolean`] | `bool` | boolean |
//! | [`Str`] | `Option<String>` | string or null |
//! | [`Enumeration`] | enum member | member name |
//! | [`Object`] | `Box<dyn Attributee>` | mapping with a `"type"` tag |
//! | [`Callable`] | [`FunctionRef`] | registered function name |
//! | [`List`] / [`Map`] | `Vec<T>` / `IndexMap<String, T>` | list / mapping |
//!
//! ## Usage
//!
//! ```
//! use attributee::{Attribute, Context, Integer};
//! use serde_json::json;
//!
//! let count = Integer::bounded(0, 10).unwrap();
//! assert_eq!(count.coerce(json!("5"), Context::empty()).unwrap(), 5);
//! assert!(count.coerce(json!(11), Context::empty()).is_err());
//! ```
//!
//! [`Attributee`]: crate::Attributee

mod boolean;
mod callable;
mod containers;
mod enumeration;
mod number;
mod object;
mod primitive;
mod string;

pub use boolean::Boolean;
pub use callable::{Callable, FunctionRef};
pub use containers::{List, Map};
pub use enumeration::{Enumerated, Enumeration};
pub use number::{Bounds, Float, Integer, Number, Numeric};
pub use object::{Object, RegistryResolver, Resolver, Subclass};
pub use primitive::{Primitive, Scalar};
pub use string::{Str, Transformer};

use crate::context::Context;
use crate::error::Result;
use crate::value::{Input, Value};

/// The coerce/dump contract every attribute implements.
pub trait Attribute: Send + Sync {
    /// The internal type produced by `coerce`.
    type Output;

    /// Convert raw external data into the declared type.
    fn coerce(&self, raw: Value, ctx: Context<'_>) -> Result<Self::Output>;

    /// Convert an internal value back into a wire value.
    fn dump(&self, value: &Self::Output) -> Result<Value>;

    /// Coerce raw input; already-coerced input passes through untouched.
    fn accept(&self, input: Input<Self::Output>, ctx: Context<'_>) -> Result<Self::Output> {
        match input {
            Input::Raw(raw) => self.coerce(raw, ctx),
            Input::Coerced(value) => Ok(value),
        }
    }
}

impl<A: Attribute + ?Sized> Attribute for &A {
    type Output = A::Output;

    fn coerce(&self, raw: Value, ctx: Context<'_>) -> Result<Self::Output> {
        (**self).coerce(raw, ctx)
    }

    fn dump(&self, value: &Self::Output) -> Result<Value> {
        (**self).dump(value)
    }
}
