use std::io::{Read, Write};

use super::{dump_with, expect_mapping, load_with, Codec, Destination, Source};
use crate::attributee::Attributee;
use crate::error::Result;
use crate::value::{Mapping, Value};

/// JSON codec. Pretty output is indented and newline-terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn compact() -> Self {
        Self::new(false)
    }
}

impl Default for JsonCodec {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn encode(&self, data: &Mapping, writer: &mut dyn Write) -> Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, data)?;
            writer.write_all(b"\n")?;
        } else {
            serde_json::to_writer(&mut *writer, data)?;
        }
        Ok(())
    }

    fn decode(&self, reader: &mut dyn Read) -> Result<Mapping> {
        let value: Value = serde_json::from_reader(reader)?;
        expect_mapping(value)
    }
}

/// Dump `entity` as pretty-printed JSON.
pub fn dump_json<'a, E: Attributee + ?Sized>(
    entity: &E,
    destination: impl Into<Destination<'a>>,
) -> Result<()> {
    dump_with(&JsonCodec::default(), entity, destination)
}

/// Load a JSON mapping and build the result with `factory`.
pub fn load_json<'a, T, F>(source: impl Into<Source<'a>>, factory: F) -> Result<T>
where
    F: FnOnce(Mapping) -> Result<T>,
{
    load_with(&JsonCodec::default(), source, factory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Mapping {
        let mut map = Mapping::new();
        map.insert("zeta".into(), json!(1));
        map.insert("alpha".into(), json!({"b": 2, "a": 1}));
        map
    }

    #[test]
    fn encode_keeps_field_order() {
        let mut out = Vec::new();
        JsonCodec::compact().encode(&sample(), &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            r#"{"zeta":1,"alpha":{"b":2,"a":1}}"#
        );
    }

    #[test]
    fn pretty_output_ends_with_newline() {
        let mut out = Vec::new();
        JsonCodec::default().encode(&sample(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("{\n  \"zeta\": 1,"));
        assert!(text.ends_with("}\n"));
    }

    #[test]
    fn decode_keeps_field_order() {
        let mut input = r#"{"c": 1, "a": 2, "b": {"y": 1, "x": 2}}"#.as_bytes();
        let map = JsonCodec::default().decode(&mut input).unwrap();
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        let nested: Vec<_> = map["b"].as_object().unwrap().keys().cloned().collect();
        assert_eq!(nested, vec!["y", "x"]);
    }

    #[test]
    fn decode_rejects_non_mapping_documents() {
        let mut input = "[1, 2, 3]".as_bytes();
        assert!(JsonCodec::default().decode(&mut input).is_err());
    }
}
