//! # Persistence
//!
//! Generic dump/load over any [`Codec`]. An attributee's `dump()` mapping is
//! encoded as-is, so files keep the declaration order of their fields and stay
//! diff-friendly. Loading decodes into an order-preserving mapping and hands
//! it to a factory, normally a [`Construct::construct`] call.
//!
//! Destinations and sources are either paths or borrowed streams:
//!
//! - A path is opened and closed inside the call. Dumps are written to a
//!   temporary sibling file and renamed into place, so a failed dump never
//!   leaves a partial file behind.
//! - A borrowed stream is written or read but stays open; the caller owns it.
//!
//! The YAML backend is only compiled with the `yaml` feature (on by default).

mod json;
#[cfg(feature = "yaml")]
mod yaml;

pub use json::{dump_json, load_json, JsonCodec};
#[cfg(feature = "yaml")]
pub use yaml::{dump_yaml, load_yaml, YamlCodec};

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::attributee::{Attributee, Construct};
use crate::context::Context;
use crate::error::{AttributeError, Result};
use crate::value::{kind_of, Mapping, Value};

/// Encoder/decoder pair for one wire format.
pub trait Codec {
    fn name(&self) -> &'static str;

    fn encode(&self, data: &Mapping, writer: &mut dyn Write) -> Result<()>;

    fn decode(&self, reader: &mut dyn Read) -> Result<Mapping>;
}

/// Where a dump goes.
pub enum Destination<'a> {
    Path(PathBuf),
    Stream(&'a mut dyn Write),
}

impl<'a> Destination<'a> {
    pub fn stream(writer: &'a mut dyn Write) -> Self {
        Destination::Stream(writer)
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Destination::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<&str> for Destination<'_> {
    fn from(path: &str) -> Self {
        Destination::Path(PathBuf::from(path))
    }
}

impl From<&Path> for Destination<'_> {
    fn from(path: &Path) -> Self {
        Destination::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Destination<'_> {
    fn from(path: PathBuf) -> Self {
        Destination::Path(path)
    }
}

impl From<&PathBuf> for Destination<'_> {
    fn from(path: &PathBuf) -> Self {
        Destination::Path(path.clone())
    }
}

impl<'a, W: Write> From<&'a mut W> for Destination<'a> {
    fn from(writer: &'a mut W) -> Self {
        Destination::Stream(writer)
    }
}

/// Where a load reads from.
pub enum Source<'a> {
    Path(PathBuf),
    Stream(&'a mut dyn Read),
}

impl<'a> Source<'a> {
    pub fn stream(reader: &'a mut dyn Read) -> Self {
        Source::Stream(reader)
    }
}

impl fmt::Debug for Source<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => f.debug_tuple("Path").field(path).finish(),
            Source::Stream(_) => f.write_str("Stream"),
        }
    }
}

impl From<&str> for Source<'_> {
    fn from(path: &str) -> Self {
        Source::Path(PathBuf::from(path))
    }
}

impl From<&Path> for Source<'_> {
    fn from(path: &Path) -> Self {
        Source::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for Source<'_> {
    fn from(path: PathBuf) -> Self {
        Source::Path(path)
    }
}

impl From<&PathBuf> for Source<'_> {
    fn from(path: &PathBuf) -> Self {
        Source::Path(path.clone())
    }
}

impl<'a, R: Read> From<&'a mut R> for Source<'a> {
    fn from(reader: &'a mut R) -> Self {
        Source::Stream(reader)
    }
}

/// Supported wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Json,
    #[cfg(feature = "yaml")]
    Yaml,
}

impl Format {
    /// Pick a format from a file extension: `.yaml`/`.yml` are YAML, anything
    /// else is JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let ext = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => "yaml".parse(),
            _ => Ok(Format::Json),
        }
    }

    pub fn codec(self, pretty: bool) -> Box<dyn Codec> {
        match self {
            Format::Json => Box::new(JsonCodec::new(pretty)),
            #[cfg(feature = "yaml")]
            Format::Yaml => Box::new(YamlCodec),
        }
    }
}

impl FromStr for Format {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Format::Json),
            #[cfg(feature = "yaml")]
            "yaml" | "yml" => Ok(Format::Yaml),
            #[cfg(not(feature = "yaml"))]
            "yaml" | "yml" => Err(AttributeError::Config(
                "YAML support is not enabled (build with the `yaml` feature)".to_string(),
            )),
            other => Err(AttributeError::Config(format!("unknown format '{}'", other))),
        }
    }
}

pub(crate) fn expect_mapping(value: Value) -> Result<Mapping> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(AttributeError::TypeMismatch {
            expected: "mapping",
            found: kind_of(&other),
        }),
    }
}

/// Write `path` through a temporary sibling that is renamed into place.
/// The temporary file is removed if any step fails.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("attributee");
    let tmp_path = dir.join(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));

    let result = File::create(&tmp_path)
        .map_err(AttributeError::from)
        .and_then(|file| {
            let mut writer = BufWriter::new(file);
            write(&mut writer)?;
            writer.flush()?;
            Ok(())
        })
        .and_then(|()| fs::rename(&tmp_path, path).map_err(AttributeError::from));
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

/// Dump `entity` through `codec`.
pub fn dump_with<'a, C, E>(
    codec: &C,
    entity: &E,
    destination: impl Into<Destination<'a>>,
) -> Result<()>
where
    C: Codec + ?Sized,
    E: Attributee + ?Sized,
{
    let data = entity.dump()?;
    match destination.into() {
        Destination::Path(path) => {
            debug!(
                format = codec.name(),
                type_name = entity.type_name(),
                path = %path.display(),
                "dumping attributee"
            );
            write_atomically(&path, |writer| codec.encode(&data, writer))
        }
        Destination::Stream(writer) => {
            debug!(
                format = codec.name(),
                type_name = entity.type_name(),
                "dumping attributee to stream"
            );
            codec.encode(&data, writer)?;
            writer.flush()?;
            Ok(())
        }
    }
}

/// Decode a mapping through `codec` and build the result with `factory`.
pub fn load_with<'a, C, T, F>(codec: &C, source: impl Into<Source<'a>>, factory: F) -> Result<T>
where
    C: Codec + ?Sized,
    F: FnOnce(Mapping) -> Result<T>,
{
    let data = match source.into() {
        Source::Path(path) => {
            debug!(format = codec.name(), path = %path.display(), "loading mapping");
            let mut reader = BufReader::new(File::open(&path)?);
            codec.decode(&mut reader)?
        }
        Source::Stream(reader) => {
            debug!(format = codec.name(), "loading mapping from stream");
            codec.decode(reader)?
        }
    };
    factory(data)
}

/// Dump `entity` in `format`, pretty-printing JSON.
pub fn dump<'a, E: Attributee + ?Sized>(
    entity: &E,
    destination: impl Into<Destination<'a>>,
    format: Format,
) -> Result<()> {
    dump_with(format.codec(true).as_ref(), entity, destination)
}

/// Load from `source` in `format` and build the result with `factory`.
pub fn load<'a, T, F>(source: impl Into<Source<'a>>, factory: F, format: Format) -> Result<T>
where
    F: FnOnce(Mapping) -> Result<T>,
{
    load_with(format.codec(true).as_ref(), source, factory)
}

/// Load a `T` from `source`, constructing it with `ctx`.
pub fn load_as<'a, T: Construct>(
    source: impl Into<Source<'a>>,
    format: Format,
    ctx: Context<'_>,
) -> Result<T> {
    load(source, |data| T::construct(data, ctx), format)
}

/// Dump to a path, choosing the format from its extension.
pub fn dump_path<E: Attributee + ?Sized>(entity: &E, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    dump(entity, path, Format::from_path(path)?)
}

/// Load from a path, choosing the format from its extension.
pub fn load_path<T, F>(path: impl AsRef<Path>, factory: F) -> Result<T>
where
    F: FnOnce(Mapping) -> Result<T>,
{
    let path = path.as_ref();
    load(path, factory, Format::from_path(path)?)
}
