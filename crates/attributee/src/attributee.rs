//! # Attributees
//!
//! An attributee is a struct whose fields are governed by attributes. It is
//! built from a mapping of raw values ([`Construct::construct`]) and turns back
//! into an ordered mapping ([`Attributee::dump`]).
//!
//! Implementations usually keep their attribute declarations in statics and
//! use [`Fields`] and [`MappingBuilder`] to do the bookkeeping:
//!
//! ```
//! use attributee::{
//!     Attributee, Construct, Context, Fields, Integer, Mapping, MappingBuilder, Result, Str,
//! };
//! use once_cell::sync::Lazy;
//!
//! static NAME: Lazy<Str> = Lazy::new(Str::new);
//! static COUNT: Lazy<Integer> = Lazy::new(|| Integer::bounded(0, 10).unwrap());
//!
//! #[derive(Debug, PartialEq)]
//! struct Counter {
//!     name: Option<String>,
//!     count: i64,
//! }
//!
//! impl Attributee for Counter {
//!     fn type_name(&self) -> &'static str {
//!         Self::TYPE_NAME
//!     }
//!
//!     fn dump(&self) -> Result<Mapping> {
//!         Ok(MappingBuilder::new()
//!             .field("name", &*NAME, &self.name)?
//!             .field("count", &*COUNT, &self.count)?
//!             .finish())
//!     }
//! }
//!
//! impl Construct for Counter {
//!     const TYPE_NAME: &'static str = "demo.Counter";
//!
//!     fn construct(values: Mapping, ctx: Context<'_>) -> Result<Self> {
//!         let mut fields = Fields::new(Self::TYPE_NAME, values, ctx);
//!         let counter = Counter {
//!             name: fields.required("name", &*NAME)?,
//!             count: fields.or_default("count", &*COUNT, 0)?,
//!         };
//!         fields.finish()?;
//!         Ok(counter)
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;

use tracing::trace;

use crate::attributes::Attribute;
use crate::context::Context;
use crate::error::{AttributeError, Result};
use crate::value::{Input, Mapping};

/// Type-erasure hooks, implemented for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// An entity composed of declared attributes.
pub trait Attributee: AsAny + fmt::Debug + Send + Sync {
    /// Stable tag written into the `"type"` key when nested in an object attribute.
    fn type_name(&self) -> &'static str;

    /// Tags of the families this type belongs to, checked by subclass constraints.
    fn lineage(&self) -> &'static [&'static str] {
        &[]
    }

    /// Dumped attribute values, in declaration order.
    fn dump(&self) -> Result<Mapping>;
}

/// An attributee that can be built from a mapping of raw values.
pub trait Construct: Attributee + Sized {
    const TYPE_NAME: &'static str;

    /// Coerce one raw value per declared attribute, rejecting unknown keys.
    fn construct(values: Mapping, ctx: Context<'_>) -> Result<Self>;
}

impl dyn Attributee {
    pub fn is<T: Attributee>(&self) -> bool {
        <dyn Attributee as AsAny>::as_any(self).is::<T>()
    }

    pub fn downcast_ref<T: Attributee>(&self) -> Option<&T> {
        <dyn Attributee as AsAny>::as_any(self).downcast_ref::<T>()
    }

    pub fn downcast<T: Attributee>(self: Box<Self>) -> Option<Box<T>> {
        <dyn Attributee as AsAny>::into_any(self).downcast::<T>().ok()
    }

    /// Whether this instance is `family` or lists it in its lineage.
    pub fn belongs_to(&self, family: &str) -> bool {
        self.type_name() == family || self.lineage().contains(&family)
    }
}

/// Consumes a mapping of raw values while an attributee is being built.
#[derive(Debug)]
pub struct Fields<'c> {
    owner: &'static str,
    values: Mapping,
    ctx: Context<'c>,
}

impl<'c> Fields<'c> {
    pub fn new(owner: &'static str, values: Mapping, ctx: Context<'c>) -> Self {
        Self { owner, values, ctx }
    }

    pub fn context(&self) -> Context<'c> {
        self.ctx
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Coerce a value that must be present.
    pub fn required<A: Attribute>(&mut self, name: &str, attr: &A) -> Result<A::Output> {
        self.optional(name, attr)?
            .ok_or_else(|| AttributeError::MissingField {
                owner: self.owner.to_string(),
                field: name.to_string(),
            })
    }

    /// Coerce a value if present.
    pub fn optional<A: Attribute>(&mut self, name: &str, attr: &A) -> Result<Option<A::Output>> {
        match self.values.shift_remove(name) {
            Some(raw) => {
                trace!(owner = self.owner, field = name, "coercing attribute");
                attr.coerce(raw, self.ctx).map(Some)
            }
            None => Ok(None),
        }
    }

    /// Coerce a value, falling back to `default` when absent.
    pub fn or_default<A: Attribute>(
        &mut self,
        name: &str,
        attr: &A,
        default: A::Output,
    ) -> Result<A::Output> {
        Ok(self.optional(name, attr)?.unwrap_or(default))
    }

    /// Accept an input that may already be coerced; absent raw input uses `default`.
    pub fn input<A: Attribute>(
        &mut self,
        name: &str,
        attr: &A,
        supplied: Option<Input<A::Output>>,
        default: A::Output,
    ) -> Result<A::Output> {
        match supplied {
            Some(input) => {
                self.values.shift_remove(name);
                attr.accept(input, self.ctx)
            }
            None => self.or_default(name, attr, default),
        }
    }

    /// Fail if any key was not claimed by a declared attribute.
    pub fn finish(self) -> Result<()> {
        match self.values.keys().next() {
            Some(unknown) => Err(AttributeError::UnknownField {
                owner: self.owner.to_string(),
                field: unknown.clone(),
            }),
            None => Ok(()),
        }
    }
}

/// Builds the ordered mapping returned by [`Attributee::dump`].
#[derive(Debug, Default)]
pub struct MappingBuilder {
    map: Mapping,
}

impl MappingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<A: Attribute>(mut self, name: &str, attr: &A, value: &A::Output) -> Result<Self> {
        let dumped = attr.dump(value)?;
        self.map.insert(name.to_string(), dumped);
        Ok(self)
    }

    pub fn finish(self) -> Mapping {
        self.map
    }
}
