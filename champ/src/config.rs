//! Run configuration
//!
//! ```yaml
//! load:
//!   0x6000: plot3d.s        # assembled, listing parsed, binary loaded at 0x6000
//!   $0800: font.bin         # loaded as-is
//! entry: MAIN               # label or numeric address
//! highlight: '#fce98d'      # histogram accent (optional)
//! instant_rts: [WAITKEY]    # labels patched to return immediately (optional)
//! ```
//!
//! Tool locations (`emulator`, `encoder`, `assembler`) and the encoder
//! timeout can be overridden as well.

use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{Address, ChampError, Rgb};
use crate::render::palette::DEFAULT_HIGHLIGHT;
use crate::symbolization::SymbolTable;

const DEFAULT_EMULATOR: &str = "./p65c02";
const DEFAULT_ENCODER: &str = "./pgif";
const DEFAULT_ASSEMBLER: &str = "Merlin32";
const DEFAULT_ENCODER_TIMEOUT_SECS: u64 = 30;

/// One `load` entry: a file placed at an origin address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadEntry {
    pub origin: Address,
    pub path: PathBuf,
}

/// Program entry point as written in the configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EntryPoint {
    Numeric(u16),
    Symbolic(String),
}

impl EntryPoint {
    /// Resolve as a label first, then as a numeric literal
    ///
    /// # Errors
    /// `Config` if neither applies.
    pub fn resolve(&self, symbols: &SymbolTable) -> Result<Address, ChampError> {
        match self {
            EntryPoint::Numeric(value) => Ok(Address(*value)),
            EntryPoint::Symbolic(name) => symbols
                .address_for(name)
                .or_else(|| Address::from_literal(name))
                .ok_or_else(|| ChampError::Config(format!("unknown entry point `{name}`"))),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(deserialize_with = "deserialize_load")]
    pub load: Vec<LoadEntry>,

    pub entry: EntryPoint,

    #[serde(default = "default_highlight", deserialize_with = "deserialize_rgb")]
    pub highlight: Rgb,

    #[serde(default)]
    pub instant_rts: Vec<String>,

    #[serde(default = "default_emulator")]
    pub emulator: String,

    #[serde(default = "default_encoder")]
    pub encoder: String,

    #[serde(default = "default_assembler")]
    pub assembler: String,

    #[serde(default = "default_encoder_timeout_secs")]
    pub encoder_timeout_secs: u64,
}

impl RunConfig {
    /// Read and validate a configuration file
    ///
    /// # Errors
    /// `MissingInputFile`, `Yaml` for malformed documents, `Config` for an
    /// empty `load` section.
    pub fn from_file(path: &Path) -> Result<Self, ChampError> {
        if !path.is_file() {
            return Err(ChampError::MissingInputFile(path.to_path_buf()));
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    /// Parse and validate configuration text
    ///
    /// # Errors
    /// See [`Self::from_file`].
    pub fn from_yaml(text: &str) -> Result<Self, ChampError> {
        let config: RunConfig = serde_yaml::from_str(text)?;
        if config.load.is_empty() {
            return Err(ChampError::Config("`load` names no files".to_string()));
        }
        Ok(config)
    }

    #[must_use]
    pub fn encoder_timeout(&self) -> Duration {
        Duration::from_secs(self.encoder_timeout_secs)
    }
}

fn default_highlight() -> Rgb {
    DEFAULT_HIGHLIGHT
}

fn default_emulator() -> String {
    DEFAULT_EMULATOR.to_string()
}

fn default_encoder() -> String {
    DEFAULT_ENCODER.to_string()
}

fn default_assembler() -> String {
    DEFAULT_ASSEMBLER.to_string()
}

fn default_encoder_timeout_secs() -> u64 {
    DEFAULT_ENCODER_TIMEOUT_SECS
}

fn deserialize_rgb<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(de::Error::custom)
}

/// Origin address given as a YAML integer or an address literal string
struct OriginKey(Address);

impl<'de> Deserialize<'de> for OriginKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OriginVisitor;

        impl Visitor<'_> for OriginVisitor {
            type Value = OriginKey;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an address between 0 and 0xffff")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<OriginKey, E> {
                u16::try_from(value)
                    .map(|v| OriginKey(Address(v)))
                    .map_err(|_| E::custom(format!("address {value:#x} out of range")))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<OriginKey, E> {
                u64::try_from(value)
                    .map_err(|_| E::custom(format!("negative address {value}")))
                    .and_then(|v| self.visit_u64(v))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<OriginKey, E> {
                Address::from_literal(value)
                    .map(OriginKey)
                    .ok_or_else(|| E::custom(format!("invalid address `{value}`")))
            }
        }

        deserializer.deserialize_any(OriginVisitor)
    }
}

/// `load` mapping in document order
fn deserialize_load<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<LoadEntry>, D::Error> {
    struct LoadVisitor;

    impl<'de> Visitor<'de> for LoadVisitor {
        type Value = Vec<LoadEntry>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a mapping of origin address to file path")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::new();
            while let Some((OriginKey(origin), path)) = map.next_entry::<OriginKey, PathBuf>()? {
                entries.push(LoadEntry { origin, path });
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(LoadVisitor)
}
