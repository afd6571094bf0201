//! # Attributee
//!
//! Attributee is a **declarative attribute library**: structs describe their
//! fields with typed attributes, and the attributes take care of turning loose
//! input (strings from a command line, numbers from a YAML file) into typed
//! values and back into plain data.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Persistence (io/)                                          │
//! │  - JSON / YAML codecs, path or stream, atomic file writes   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attributees (attributee.rs)                                │
//! │  - construct from a mapping, dump to an ordered mapping     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Attributes (attributes/)                                   │
//! │  - coerce raw values, dump typed values                     │
//! │  - Object / Callable resolve names through registry.rs      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: Order Is Data
//!
//! Mappings are order-preserving all the way through. A dumped file lists
//! fields in declaration order, and loading it back yields the same order,
//! so persisted files diff cleanly.
//!
//! ## Module Overview
//!
//! - [`attributes`]: The attribute kinds and the [`Attribute`] contract
//! - [`attributee`]: The [`Attributee`] / [`Construct`] contract and helpers
//! - [`registry`]: Type and function registries used for late binding
//! - [`io`]: Codecs and dump/load entry points
//! - [`config`]: Persistence settings
//! - [`context`]: Opaque caller context threaded through coercion
//! - [`value`]: Wire values and the raw-or-coerced [`Input`]
//! - [`error`]: Error types

pub mod attributee;
pub mod attributes;
pub mod config;
pub mod context;
pub mod error;
pub mod io;
pub mod registry;
pub mod value;

pub use attributee::{AsAny, Attributee, Construct, Fields, MappingBuilder};
pub use attributes::{
    Attribute, Boolean, Bounds, Callable, Enumerated, Enumeration, Float, FunctionRef, Integer,
    List, Map, Number, Numeric, Object, Primitive, RegistryResolver, Resolver, Scalar, Str,
    Subclass, Transformer,
};
pub use config::PersistConfig;
pub use context::Context;
pub use error::{AttributeError, Result};
pub use io::{dump, dump_json, dump_path, load, load_as, load_json, load_path, Codec, Format};
pub use io::{Destination, JsonCodec, Source};
#[cfg(feature = "yaml")]
pub use io::{dump_yaml, load_yaml, YamlCodec};
pub use registry::{FunctionRegistry, TypeRegistry};
pub use value::{Input, Mapping, Value};
