#![allow(dead_code)]

use std::sync::Arc;

use attributee::{
    Attributee, Callable, Construct, Context, Enumerated, Enumeration, Fields, Float,
    FunctionRef, FunctionRegistry, Integer, List, Mapping, MappingBuilder, Object, Result, Str,
    Subclass, TypeRegistry,
};
use once_cell::sync::Lazy;

pub type Unary = fn(f64) -> f64;

pub static TYPES: Lazy<Arc<TypeRegistry>> = Lazy::new(|| {
    let registry = TypeRegistry::new();
    registry
        .register::<Item>()
        .register::<Square>()
        .register::<Marker>()
        .register::<Drawing>();
    Arc::new(registry)
});

pub static FUNCTIONS: Lazy<Arc<FunctionRegistry>> = Lazy::new(|| {
    let registry = FunctionRegistry::new();
    registry
        .register("core::f64::sqrt", f64::sqrt as Unary)
        .register("core::f64::abs", f64::abs as Unary);
    registry
        .alias("math.sqrt", "core::f64::sqrt")
        .expect("sqrt is registered");
    Arc::new(registry)
});

static NAME: Lazy<Str> = Lazy::new(Str::new);
static COUNT: Lazy<Integer> = Lazy::new(|| Integer::bounded(0, 10).unwrap());

/// A name with a small bounded counter.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub name: Option<String>,
    pub count: i64,
}

impl Attributee for Item {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn dump(&self) -> Result<Mapping> {
        Ok(MappingBuilder::new()
            .field("name", &*NAME, &self.name)?
            .field("count", &*COUNT, &self.count)?
            .finish())
    }
}

impl Construct for Item {
    const TYPE_NAME: &'static str = "fixtures.Item";

    fn construct(values: Mapping, ctx: Context<'_>) -> Result<Self> {
        let mut fields = Fields::new(Self::TYPE_NAME, values, ctx);
        let item = Item {
            name: fields.required("name", &*NAME)?,
            count: fields.or_default("count", &*COUNT, 0)?,
        };
        fields.finish()?;
        Ok(item)
    }
}

static SIDE: Lazy<Float> = Lazy::new(|| Float::at_least(0.0));

/// Member of the `fixtures.Shape` family.
#[derive(Debug, Clone, PartialEq)]
pub struct Square {
    pub side: f64,
}

impl Attributee for Square {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn lineage(&self) -> &'static [&'static str] {
        &["fixtures.Shape"]
    }

    fn dump(&self) -> Result<Mapping> {
        Ok(MappingBuilder::new().field("side", &*SIDE, &self.side)?.finish())
    }
}

impl Construct for Square {
    const TYPE_NAME: &'static str = "fixtures.Square";

    fn construct(values: Mapping, ctx: Context<'_>) -> Result<Self> {
        let mut fields = Fields::new(Self::TYPE_NAME, values, ctx);
        let side = fields.required("side", &*SIDE)?;
        fields.finish()?;
        Ok(Square { side })
    }
}

/// Not a shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub label: Option<String>,
}

impl Attributee for Marker {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn dump(&self) -> Result<Mapping> {
        Ok(MappingBuilder::new().field("label", &*NAME, &self.label)?.finish())
    }
}

impl Construct for Marker {
    const TYPE_NAME: &'static str = "fixtures.Marker";

    fn construct(values: Mapping, ctx: Context<'_>) -> Result<Self> {
        let mut fields = Fields::new(Self::TYPE_NAME, values, ctx);
        let label = fields.optional("label", &*NAME)?.flatten();
        fields.finish()?;
        Ok(Marker { label })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Pencil,
    Brush,
}

impl Enumerated for Tool {
    const ENUM_NAME: &'static str = "Tool";

    fn members() -> &'static [Self] {
        &[Tool::Pencil, Tool::Brush]
    }

    fn name(&self) -> &'static str {
        match self {
            Tool::Pencil => "Pencil",
            Tool::Brush => "Brush",
        }
    }
}

const TOOL: Enumeration<Tool> = Enumeration::new();
static SHAPE: Lazy<Object> = Lazy::new(|| {
    Object::with_registry(TYPES.clone()).subclass(Subclass::family("fixtures.Shape"))
});
static SCALE: Lazy<Callable> = Lazy::new(|| Callable::with_registry(FUNCTIONS.clone()));
static TAGS: Lazy<List<Str>> = Lazy::new(|| List::new(Str::new()).with_separator(","));

/// Composite holding one of every attribute kind the tests exercise.
#[derive(Debug)]
pub struct Drawing {
    pub title: Option<String>,
    pub shape: Box<dyn Attributee>,
    pub tool: Tool,
    pub scale: FunctionRef,
    pub tags: Vec<Option<String>>,
}

impl Attributee for Drawing {
    fn type_name(&self) -> &'static str {
        Self::TYPE_NAME
    }

    fn dump(&self) -> Result<Mapping> {
        Ok(MappingBuilder::new()
            .field("title", &*NAME, &self.title)?
            .field("shape", &*SHAPE, &self.shape)?
            .field("tool", &TOOL, &self.tool)?
            .field("scale", &*SCALE, &self.scale)?
            .field("tags", &*TAGS, &self.tags)?
            .finish())
    }
}

impl Construct for Drawing {
    const TYPE_NAME: &'static str = "fixtures.Drawing";

    fn construct(values: Mapping, ctx: Context<'_>) -> Result<Self> {
        let mut fields = Fields::new(Self::TYPE_NAME, values, ctx);
        let drawing = Drawing {
            title: fields.required("title", &*NAME)?,
            shape: fields.required("shape", &*SHAPE)?,
            tool: fields.or_default("tool", &TOOL, Tool::Pencil)?,
            scale: fields.required("scale", &*SCALE)?,
            tags: fields.or_default("tags", &*TAGS, Vec::new())?,
        };
        fields.finish()?;
        Ok(drawing)
    }
}
