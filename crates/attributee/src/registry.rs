//! Name registries for late-bound construction.
//!
//! Serialized object and callable values name their target with a string tag.
//! Instead of importing code by name, every module that defines a loadable
//! type or function registers it under a stable tag at startup, and
//! resolution becomes a table lookup.
//!
//! Each registry type can be used standalone (shared through an `Arc`) or via
//! the process-wide instances returned by [`types`] and [`functions`].

use std::any::Any;
use std::fmt;
use std::sync::{PoisonError, RwLock};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::attributee::{Attributee, Construct};
use crate::attributes::FunctionRef;
use crate::context::Context;
use crate::error::{AttributeError, Result};
use crate::value::Mapping;

/// Builds a boxed attributee from its remaining fields.
pub type Constructor = fn(Mapping, Context<'_>) -> Result<Box<dyn Attributee>>;

/// Typed constructor stored by [`FunctionRegistry::register_constructor`].
pub type ConstructorFn<T> = fn(Mapping, Context<'_>) -> Result<T>;

fn construct_boxed<T: Construct>(fields: Mapping, ctx: Context<'_>) -> Result<Box<dyn Attributee>> {
    Ok(Box::new(T::construct(fields, ctx)?))
}

/// Maps type tags to attributee constructors.
#[derive(Default)]
pub struct TypeRegistry {
    entries: RwLock<IndexMap<String, Constructor>>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under its own `TYPE_NAME`. Re-registering replaces the entry.
    pub fn register<T: Construct>(&self) -> &Self {
        self.insert(T::TYPE_NAME, construct_boxed::<T>)
    }

    /// Register `T` under an additional tag.
    pub fn register_alias<T: Construct>(&self, alias: &str) -> &Self {
        self.insert(alias, construct_boxed::<T>)
    }

    pub fn register_constructor(&self, name: &str, constructor: Constructor) -> &Self {
        self.insert(name, constructor)
    }

    fn insert(&self, name: &str, constructor: Constructor) -> &Self {
        debug!(type_name = name, "registering attributee type");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), constructor);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered tags in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    /// Build the type registered under `name` from `fields`.
    pub fn construct(
        &self,
        name: &str,
        fields: Mapping,
        ctx: Context<'_>,
    ) -> Result<Box<dyn Attributee>> {
        // Copy the constructor out so nested resolution can take the lock again.
        let constructor = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .copied()
            .ok_or_else(|| AttributeError::Resolution(format!("unknown type '{}'", name)))?;
        debug!(type_name = name, "constructing attributee");
        constructor(fields, ctx)
    }
}

/// Maps function names to type-erased callable targets.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    entries: RwLock<IndexMap<String, FunctionRef>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `target` under its canonical `name`.
    pub fn register<F: Any + Send + Sync>(&self, name: &str, target: F) -> &Self {
        debug!(function = name, "registering function");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), FunctionRef::new(name, target));
        self
    }

    /// Register the constructor of `T` as a callable named `T::TYPE_NAME`.
    pub fn register_constructor<T: Construct>(&self) -> &Self {
        let constructor: ConstructorFn<T> = T::construct;
        self.register(T::TYPE_NAME, constructor)
    }

    /// Make `alias` resolve to the target registered as `canonical`.
    pub fn alias(&self, alias: &str, canonical: &str) -> Result<&Self> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let target = entries.get(canonical).cloned().ok_or_else(|| {
            AttributeError::Resolution(format!("cannot alias unknown function '{}'", canonical))
        })?;
        debug!(function = canonical, alias, "registering function alias");
        entries.insert(alias.to_string(), target);
        Ok(self)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Look up a function; the returned reference is untagged.
    pub fn resolve(&self, name: &str) -> Result<FunctionRef> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| AttributeError::Resolution(format!("unknown function '{}'", name)))
    }
}

static TYPES: Lazy<TypeRegistry> = Lazy::new(TypeRegistry::new);
static FUNCTIONS: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::new);

/// Process-wide type registry used by `Object::new()`.
pub fn types() -> &'static TypeRegistry {
    &TYPES
}

/// Process-wide function registry used by `Callable::new()`.
pub fn functions() -> &'static FunctionRegistry {
    &FUNCTIONS
}

/// Register `T` in the global type registry.
pub fn register_type<T: Construct>() {
    types().register::<T>();
}

/// Register a function in the global function registry.
pub fn register_function<F: Any + Send + Sync>(name: &str, target: F) {
    functions().register(name, target);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributee::{Fields, MappingBuilder};
    use crate::attributes::Integer;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Tick {
        n: i64,
    }

    impl Attributee for Tick {
        fn type_name(&self) -> &'static str {
            Self::TYPE_NAME
        }

        fn dump(&self) -> Result<Mapping> {
            Ok(MappingBuilder::new().field("n", &Integer::new(), &self.n)?.finish())
        }
    }

    impl Construct for Tick {
        const TYPE_NAME: &'static str = "registry.Tick";

        fn construct(values: Mapping, ctx: Context<'_>) -> Result<Self> {
            let mut fields = Fields::new(Self::TYPE_NAME, values, ctx);
            let n = fields.required("n", &Integer::new())?;
            fields.finish()?;
            Ok(Tick { n })
        }
    }

    fn fields(n: i64) -> Mapping {
        let mut map = Mapping::new();
        map.insert("n".into(), json!(n));
        map
    }

    #[test]
    fn constructs_registered_types() {
        let registry = TypeRegistry::new();
        registry.register::<Tick>().register_alias::<Tick>("legacy.Tick");
        assert_eq!(registry.names(), vec!["registry.Tick", "legacy.Tick"]);

        let built = registry
            .construct("legacy.Tick", fields(3), Context::empty())
            .unwrap();
        assert_eq!(built.downcast_ref::<Tick>(), Some(&Tick { n: 3 }));
    }

    #[test]
    fn unknown_type_is_a_resolution_error() {
        let registry = TypeRegistry::new();
        let err = registry
            .construct("nope.Missing", Mapping::new(), Context::empty())
            .unwrap_err();
        assert!(matches!(err, AttributeError::Resolution(_)));
    }

    #[test]
    fn functions_resolve_and_alias() {
        let registry = FunctionRegistry::new();
        registry.register("std.f64.sqrt", f64::sqrt as fn(f64) -> f64);
        registry.alias("math.sqrt", "std.f64.sqrt").unwrap();

        let sqrt = registry.resolve("math.sqrt").unwrap();
        assert_eq!(sqrt.canonical_name(), "std.f64.sqrt");
        assert_eq!(sqrt.get::<fn(f64) -> f64>().map(|f| f(16.0)), Some(4.0));
        assert!(registry.alias("x", "not.there").is_err());
        assert!(matches!(
            registry.resolve("math.cbrt"),
            Err(AttributeError::Resolution(_))
        ));
    }

    #[test]
    fn constructors_register_as_callables() {
        let registry = FunctionRegistry::new();
        registry.register_constructor::<Tick>();
        let target = registry.resolve("registry.Tick").unwrap();
        let build = target.get::<ConstructorFn<Tick>>().unwrap();
        assert_eq!(build(fields(9), Context::empty()).unwrap(), Tick { n: 9 });
    }
}
