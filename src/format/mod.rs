//! Serialization formats for configuration files
//!
//! The registry is a fixed table: every [`Format`] maps to one static
//! [`Codec`], a pair of plain functions converting between file bytes and
//! [`Contents`]. Nothing is registered at runtime.
//!
//! | Format | Contents | Default for |
//! |---|---|---|
//! | `PRETTY_JSON` | `Value` | `.json` |
//! | `JSON` | `Value` | |
//! | `YAML` (`YML`) | `Value` | `.yaml`, `.yml` |
//! | `INI` | `Value` | `.ini` |
//! | `BIN` | `Bytes` | `.bin` |
//! | `ID` | `Text` | anything else |
//! | `LINES` | `Lines` | |

mod contents;
mod ini;

pub use contents::Contents;

use eyre::{Context, Result};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Parse function: raw file bytes to contents
pub type ParseFn = fn(&[u8]) -> Result<Contents>;

/// Stringify function: contents to the bytes written on disk
pub type StringifyFn = fn(&Contents) -> Result<Vec<u8>>;

/// A parse/stringify pair
///
/// Any `Codec` can be passed where the store accepts an explicit parser or
/// stringifier, so callers are not limited to the built-in formats.
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    pub name: &'static str,
    pub parse: ParseFn,
    pub stringify: StringifyFn,
}

impl Codec {
    pub fn parse(&self, bytes: &[u8]) -> Result<Contents> {
        (self.parse)(bytes)
    }

    pub fn stringify(&self, contents: &Contents) -> Result<Vec<u8>> {
        (self.stringify)(contents)
    }
}

impl From<Format> for Codec {
    fn from(format: Format) -> Self {
        *format.codec()
    }
}

/// Built-in formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    PrettyJson,
    Json,
    Yaml,
    Ini,
    Bin,
    Id,
    Lines,
}

static REGISTRY: [Codec; 7] = [
    Codec {
        name: "PRETTY_JSON",
        parse: parse_json,
        stringify: stringify_pretty_json,
    },
    Codec {
        name: "JSON",
        parse: parse_json,
        stringify: stringify_json,
    },
    Codec {
        name: "YAML",
        parse: parse_yaml,
        stringify: stringify_yaml,
    },
    Codec {
        name: "INI",
        parse: parse_ini,
        stringify: stringify_ini,
    },
    Codec {
        name: "BIN",
        parse: parse_bin,
        stringify: stringify_bin,
    },
    Codec {
        name: "ID",
        parse: parse_id,
        stringify: stringify_id,
    },
    Codec {
        name: "LINES",
        parse: parse_lines,
        stringify: stringify_lines,
    },
];

impl Format {
    pub const ALL: [Format; 7] = [
        Format::PrettyJson,
        Format::Json,
        Format::Yaml,
        Format::Ini,
        Format::Bin,
        Format::Id,
        Format::Lines,
    ];

    /// The registry entry for this format
    pub fn codec(self) -> &'static Codec {
        &REGISTRY[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.codec().name
    }

    pub fn parse(self, bytes: &[u8]) -> Result<Contents> {
        self.codec().parse(bytes)
    }

    pub fn stringify(self, contents: &Contents) -> Result<Vec<u8>> {
        self.codec().stringify(contents)
    }

    /// Format implied by a file name's suffix, or `None` when the suffix is
    /// not one the registry claims
    ///
    /// Matching is case-sensitive: `settings.JSON` is not JSON.
    pub fn from_extension(file: impl AsRef<Path>) -> Option<Format> {
        let ext = file.as_ref().extension()?.to_str()?;
        match ext {
            "json" => Some(Format::PrettyJson),
            "yaml" | "yml" => Some(Format::Yaml),
            "ini" => Some(Format::Ini),
            "bin" => Some(Format::Bin),
            _ => None,
        }
    }

    /// Default format for reading `file`: by suffix, otherwise `ID`
    pub fn for_file(file: impl AsRef<Path>) -> Format {
        Self::from_extension(file).unwrap_or(Format::Id)
    }

    /// Default format for writing `contents` to `file`
    ///
    /// The suffix decides first. A mapping written to a file with an
    /// unrecognized suffix is stored as pretty JSON; anything else is `ID`.
    ///
    /// A mapping saved to `.yaml` or `.ini` is written in that format, not
    /// as pretty JSON, so a later read with the same suffix parses it.
    pub fn for_save(file: impl AsRef<Path>, contents: &Contents) -> Format {
        match Self::from_extension(file) {
            Some(format) => format,
            None if contents.is_mapping() => Format::PrettyJson,
            None => Format::Id,
        }
    }
}

impl FromStr for Format {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        match normalized.as_str() {
            "PRETTY_JSON" => Ok(Format::PrettyJson),
            "JSON" => Ok(Format::Json),
            "YAML" | "YML" => Ok(Format::Yaml),
            "INI" => Ok(Format::Ini),
            "BIN" => Ok(Format::Bin),
            "ID" => Ok(Format::Id),
            "LINES" => Ok(Format::Lines),
            _ => eyre::bail!("Unknown format: {}", s),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).context("Config file is not valid UTF-8")
}

fn structured(contents: &Contents, format: &str) -> Result<Value> {
    contents
        .to_value()
        .ok_or_else(|| eyre::eyre!("{} cannot encode {} contents", format, contents.kind()))
}

fn parse_json(bytes: &[u8]) -> Result<Contents> {
    let value: Value = serde_json::from_str(utf8(bytes)?).context("Failed to parse JSON")?;
    Ok(Contents::Value(value))
}

fn stringify_pretty_json(contents: &Contents) -> Result<Vec<u8>> {
    let value = structured(contents, "PRETTY_JSON")?;
    Ok(serde_json::to_string_pretty(&value)?.into_bytes())
}

fn stringify_json(contents: &Contents) -> Result<Vec<u8>> {
    let value = structured(contents, "JSON")?;
    Ok(serde_json::to_string(&value)?.into_bytes())
}

fn parse_yaml(bytes: &[u8]) -> Result<Contents> {
    let value: Value = serde_yaml::from_str(utf8(bytes)?).context("Failed to parse YAML")?;
    Ok(Contents::Value(value))
}

fn stringify_yaml(contents: &Contents) -> Result<Vec<u8>> {
    let value = structured(contents, "YAML")?;
    Ok(serde_yaml::to_string(&value)
        .context("Failed to serialize YAML")?
        .into_bytes())
}

fn parse_ini(bytes: &[u8]) -> Result<Contents> {
    Ok(Contents::Value(ini::parse(utf8(bytes)?)?))
}

fn stringify_ini(contents: &Contents) -> Result<Vec<u8>> {
    let Contents::Value(value) = contents else {
        eyre::bail!("INI cannot encode {} contents", contents.kind());
    };
    Ok(ini::stringify(value)?.into_bytes())
}

fn parse_bin(bytes: &[u8]) -> Result<Contents> {
    Ok(Contents::Bytes(bytes.to_vec()))
}

fn stringify_bin(contents: &Contents) -> Result<Vec<u8>> {
    match contents {
        Contents::Bytes(bytes) => Ok(bytes.clone()),
        Contents::Text(text) => Ok(text.as_bytes().to_vec()),
        other => eyre::bail!("BIN cannot encode {} contents", other.kind()),
    }
}

fn parse_id(bytes: &[u8]) -> Result<Contents> {
    Ok(Contents::Text(utf8(bytes)?.to_string()))
}

fn stringify_id(contents: &Contents) -> Result<Vec<u8>> {
    match contents {
        Contents::Text(text) => Ok(text.as_bytes().to_vec()),
        Contents::Value(Value::String(text)) => Ok(text.as_bytes().to_vec()),
        Contents::Bytes(bytes) => Ok(bytes.clone()),
        other => eyre::bail!("ID cannot encode {} contents", other.kind()),
    }
}

fn parse_lines(bytes: &[u8]) -> Result<Contents> {
    let lines = utf8(bytes)?.split('\n').map(str::to_string).collect();
    Ok(Contents::Lines(lines))
}

fn stringify_lines(contents: &Contents) -> Result<Vec<u8>> {
    let joined = match contents {
        Contents::Lines(lines) => lines.join("\n"),
        Contents::Value(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| eyre::eyre!("LINES expects an array of strings"))
            })
            .collect::<Result<Vec<_>>>()?
            .join("\n"),
        other => eyre::bail!("LINES cannot encode {} contents", other.kind()),
    };
    Ok(joined.into_bytes())
}
