//! Polymorphic nested objects.
//!
//! An object value is a mapping whose `"type"` key names the concrete
//! attributee to build. The remaining keys are forwarded to that type's
//! constructor, so a configuration file picks the implementation at
//! serialization time rather than at schema-declaration time. Dumping writes
//! the tag back, which makes the mapping self-describing.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::Attribute;
use crate::attributee::{Attributee, Construct};
use crate::context::Context;
use crate::error::{AttributeError, Result};
use crate::registry::{self, TypeRegistry};
use crate::value::{kind_of, Mapping, Value};

const TYPE_KEY: &str = "type";

/// Selects and builds a concrete attributee from a type tag.
///
/// A missing tag is passed as `None`; what that means is up to the resolver.
pub trait Resolver: Send + Sync {
    fn resolve(
        &self,
        type_name: Option<&str>,
        ctx: Context<'_>,
        fields: Mapping,
    ) -> Result<Box<dyn Attributee>>;
}

impl<F> Resolver for F
where
    F: Fn(Option<&str>, Context<'_>, Mapping) -> Result<Box<dyn Attributee>> + Send + Sync,
{
    fn resolve(
        &self,
        type_name: Option<&str>,
        ctx: Context<'_>,
        fields: Mapping,
    ) -> Result<Box<dyn Attributee>> {
        self(type_name, ctx, fields)
    }
}

/// Default resolver: looks the tag up in a [`TypeRegistry`].
#[derive(Debug, Clone, Default)]
pub struct RegistryResolver {
    registry: Option<Arc<TypeRegistry>>,
}

impl RegistryResolver {
    /// Resolve through the global type registry.
    pub fn global() -> Self {
        Self { registry: None }
    }

    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            registry: Some(registry),
        }
    }
}

impl Resolver for RegistryResolver {
    fn resolve(
        &self,
        type_name: Option<&str>,
        ctx: Context<'_>,
        fields: Mapping,
    ) -> Result<Box<dyn Attributee>> {
        let type_name = type_name
            .ok_or_else(|| AttributeError::Resolution("missing \"type\" tag".to_string()))?;
        let registry = match &self.registry {
            Some(registry) => registry.as_ref(),
            None => registry::types(),
        };
        registry.construct(type_name, fields, ctx)
    }
}

/// Constraint that a resolved object belongs to a type family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subclass {
    family: Cow<'static, str>,
}

impl Subclass {
    /// `T` itself, or any type listing `T::TYPE_NAME` in its lineage.
    pub fn of<T: Construct>() -> Self {
        Self::family(T::TYPE_NAME)
    }

    /// Any type whose tag or lineage contains `family`.
    pub fn family(family: impl Into<Cow<'static, str>>) -> Self {
        Self {
            family: family.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.family
    }

    pub fn admits(&self, object: &dyn Attributee) -> bool {
        object.belongs_to(&self.family)
    }
}

/// Attribute holding a nested attributee of a type chosen by the data.
#[derive(Clone)]
pub struct Object {
    resolver: Arc<dyn Resolver>,
    subclass: Option<Subclass>,
}

impl Object {
    /// Resolve through the global type registry.
    pub fn new() -> Self {
        Self::with_resolver(RegistryResolver::global())
    }

    pub fn with_registry(registry: Arc<TypeRegistry>) -> Self {
        Self::with_resolver(RegistryResolver::new(registry))
    }

    pub fn with_resolver(resolver: impl Resolver + 'static) -> Self {
        Self {
            resolver: Arc::new(resolver),
            subclass: None,
        }
    }

    /// Share a resolver between several attributes.
    pub fn with_shared_resolver(resolver: Arc<dyn Resolver>) -> Self {
        Self {
            resolver,
            subclass: None,
        }
    }

    pub fn subclass(mut self, constraint: Subclass) -> Self {
        self.subclass = Some(constraint);
        self
    }

    pub fn constraint(&self) -> Option<&Subclass> {
        self.subclass.as_ref()
    }
}

impl Default for Object {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("subclass", &self.subclass)
            .finish_non_exhaustive()
    }
}

impl Attribute for Object {
    type Output = Box<dyn Attributee>;

    fn coerce(&self, raw: Value, ctx: Context<'_>) -> Result<Box<dyn Attributee>> {
        let mut fields = match raw {
            Value::Object(fields) => fields,
            other => {
                return Err(AttributeError::TypeMismatch {
                    expected: "mapping",
                    found: kind_of(&other),
                })
            }
        };

        let type_name = match fields.shift_remove(TYPE_KEY) {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name),
            Some(other) => {
                return Err(AttributeError::TypeMismatch {
                    expected: "string type tag",
                    found: kind_of(&other),
                })
            }
        };

        debug!(type_name = ?type_name, fields = fields.len(), "resolving object");
        let object = self.resolver.resolve(type_name.as_deref(), ctx, fields)?;

        if let Some(constraint) = &self.subclass {
            if !constraint.admits(object.as_ref()) {
                return Err(AttributeError::NotSubclass {
                    expected: constraint.name().to_string(),
                });
            }
        }
        Ok(object)
    }

    fn dump(&self, value: &Box<dyn Attributee>) -> Result<Value> {
        let object: &dyn Attributee = value.as_ref();
        let mut data = object.dump()?;
        data.insert(
            TYPE_KEY.to_string(),
            Value::String(object.type_name().to_string()),
        );
        Ok(Value::Object(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributee::{Fields, MappingBuilder};
    use crate::attributes::Float;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    struct Circle {
        radius: f64,
    }

    impl Attributee for Circle {
        fn type_name(&self) -> &'static str {
            Self::TYPE_NAME
        }

        fn lineage(&self) -> &'static [&'static str] {
            &["shapes.Shape"]
        }

        fn dump(&self) -> Result<Mapping> {
            Ok(MappingBuilder::new()
                .field("radius", &Float::new(), &self.radius)?
                .finish())
        }
    }

    impl Construct for Circle {
        const TYPE_NAME: &'static str = "shapes.Circle";

        fn construct(values: Mapping, ctx: Context<'_>) -> Result<Self> {
            let mut fields = Fields::new(Self::TYPE_NAME, values, ctx);
            let radius = fields.required("radius", &Float::at_least(0.0))?;
            fields.finish()?;
            Ok(Circle { radius })
        }
    }

    #[derive(Debug, PartialEq)]
    struct Label {
        text: Option<String>,
    }

    impl Attributee for Label {
        fn type_name(&self) -> &'static str {
            Self::TYPE_NAME
        }

        fn dump(&self) -> Result<Mapping> {
            Ok(MappingBuilder::new()
                .field("text", &crate::attributes::Str::new(), &self.text)?
                .finish())
        }
    }

    impl Construct for Label {
        const TYPE_NAME: &'static str = "widgets.Label";

        fn construct(values: Mapping, ctx: Context<'_>) -> Result<Self> {
            let mut fields = Fields::new(Self::TYPE_NAME, values, ctx);
            let text = fields.optional("text", &crate::attributes::Str::new())?.flatten();
            fields.finish()?;
            Ok(Label { text })
        }
    }

    fn registry() -> Arc<TypeRegistry> {
        let registry = TypeRegistry::new();
        registry.register::<Circle>().register::<Label>();
        Arc::new(registry)
    }

    #[test]
    fn resolves_by_type_tag() {
        let attr = Object::with_registry(registry());
        let value = attr
            .coerce(json!({"type": "shapes.Circle", "radius": "2.5"}), Context::empty())
            .unwrap();
        assert_eq!(value.downcast_ref::<Circle>(), Some(&Circle { radius: 2.5 }));
    }

    #[test]
    fn dump_injects_the_type_tag() {
        let attr = Object::with_registry(registry());
        let value: Box<dyn Attributee> = Box::new(Circle { radius: 1.0 });
        let dumped = attr.dump(&value).unwrap();
        assert_eq!(dumped, json!({"radius": 1.0, "type": "shapes.Circle"}));

        let rebuilt = attr.coerce(dumped, Context::empty()).unwrap();
        assert!(rebuilt.is::<Circle>());
        assert_eq!(rebuilt.downcast_ref::<Circle>(), Some(&Circle { radius: 1.0 }));
    }

    #[test]
    fn non_mapping_input_is_a_type_mismatch() {
        let attr = Object::with_registry(registry());
        for raw in [json!("shapes.Circle"), json!([1]), json!(null)] {
            assert!(matches!(
                attr.coerce(raw, Context::empty()),
                Err(AttributeError::TypeMismatch { .. })
            ));
        }
    }

    fn untagged_circle(
        type_name: Option<&str>,
        ctx: Context<'_>,
        fields: Mapping,
    ) -> Result<Box<dyn Attributee>> {
        assert!(type_name.is_none());
        Ok(Box::new(Circle::construct(fields, ctx)?))
    }

    fn circle_from_context(
        _type_name: Option<&str>,
        ctx: Context<'_>,
        _fields: Mapping,
    ) -> Result<Box<dyn Attributee>> {
        let radius = *ctx.get::<f64>().expect("radius in context");
        Ok(Box::new(Circle { radius }))
    }

    #[test]
    fn missing_tag_reaches_the_resolver_as_none() {
        let attr = Object::with_resolver(untagged_circle);
        let value = attr.coerce(json!({"radius": 4}), Context::empty()).unwrap();
        assert_eq!(value.downcast_ref::<Circle>(), Some(&Circle { radius: 4.0 }));

        let default = Object::with_registry(registry());
        assert!(matches!(
            default.coerce(json!({"radius": 4}), Context::empty()),
            Err(AttributeError::Resolution(_))
        ));
    }

    #[test]
    fn subclass_constraint_checks_lineage() {
        let shapes = Object::with_registry(registry()).subclass(Subclass::family("shapes.Shape"));
        assert!(shapes
            .coerce(json!({"type": "shapes.Circle", "radius": 1}), Context::empty())
            .is_ok());

        let err = shapes
            .coerce(json!({"type": "widgets.Label", "text": "hi"}), Context::empty())
            .unwrap_err();
        assert!(matches!(
            err,
            AttributeError::NotSubclass { ref expected } if expected == "shapes.Shape"
        ));

        let circles = Object::with_registry(registry()).subclass(Subclass::of::<Circle>());
        assert_eq!(circles.constraint().map(Subclass::name), Some("shapes.Circle"));
    }

    #[test]
    fn resolver_receives_context_unchanged() {
        let attr = Object::with_resolver(circle_from_context);
        let radius = 7.5f64;
        let value = attr.coerce(json!({}), Context::new(&radius)).unwrap();
        assert_eq!(value.downcast_ref::<Circle>(), Some(&Circle { radius: 7.5 }));
    }

    #[test]
    fn inner_failures_propagate_unchanged() {
        let attr = Object::with_registry(registry());
        let err = attr
            .coerce(json!({"type": "shapes.Circle", "radius": -1}), Context::empty())
            .unwrap_err();
        assert!(matches!(err, AttributeError::BelowMinimum { .. }));
    }
}
