use std::io::{Read, Write};

use super::{dump_with, expect_mapping, load_with, Codec, Destination, Source};
use crate::attributee::Attributee;
use crate::error::Result;
use crate::value::{Mapping, Value};

/// YAML codec. Mappings are emitted and read back in insertion order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct YamlCodec;

impl Codec for YamlCodec {
    fn name(&self) -> &'static str {
        "yaml"
    }

    fn encode(&self, data: &Mapping, writer: &mut dyn Write) -> Result<()> {
        serde_yaml::to_writer(&mut *writer, data)?;
        Ok(())
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<Mapping> {
        let value: Value = serde_yaml::from_reader(reader)?;
        expect_mapping(value)
    }
}

/// Dump `entity` as YAML.
pub fn dump_yaml<'a, E: Attributee + ?Sized>(
    entity: &E,
    destination: impl Into<Destination<'a>>,
) -> Result<()> {
    dump_with(&YamlCodec, entity, destination)
}

/// Load a YAML mapping and build the result with `factory`.
pub fn load_yaml<'a, T, F>(source: impl Into<Source<'a>>, factory: F) -> Result<T>
where
    F: FnOnce(Mapping) -> Result<T>,
{
    load_with(&YamlCodec, source, factory)
}
