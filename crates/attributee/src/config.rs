//! # Configuration
//!
//! Persistence settings are managed by [`confique`], layering environment
//! variables over an optional TOML file over compiled defaults.
//!
//! | Key | Env | Default | Description |
//! |-----|-----|---------|-------------|
//! | `format` | | `json` | Wire format used by [`PersistConfig::codec`] |
//! | `pretty` | `ATTRIBUTEE_PRETTY` | `true` | Indent JSON output |

use std::path::Path;

use confique::Config;
use serde::{Deserialize, Serialize};

use crate::error::{AttributeError, Result};
use crate::io::{Codec, Format};

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PersistConfig {
    /// Wire format ("json" or "yaml"). When absent, JSON is used.
    pub format: Option<Format>,

    /// Indent JSON output.
    #[config(default = true, env = "ATTRIBUTEE_PRETTY")]
    pub pretty: bool,
}

impl Default for PersistConfig {
    fn default() -> Self {
        Self {
            format: None,
            pretty: true,
        }
    }
}

impl PersistConfig {
    /// Load from `path`, with environment overrides and defaults filled in.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder()
            .env()
            .file(path.as_ref())
            .load()
            .map_err(|e| AttributeError::Config(e.to_string()))
    }

    pub fn format(&self) -> Format {
        self.format.unwrap_or_default()
    }

    pub fn codec(&self) -> Box<dyn Codec> {
        self.format().codec(self.pretty)
    }
}
