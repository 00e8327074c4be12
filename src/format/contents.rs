//! In-memory representation of a configuration file

use eyre::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parsed contents of a configuration file
///
/// Which variant a file produces depends on the codec that read it:
/// structured formats (JSON, YAML, INI) yield [`Contents::Value`], `ID` yields
/// [`Contents::Text`], `LINES` yields [`Contents::Lines`] and `BIN` yields
/// [`Contents::Bytes`].
#[derive(Debug, Clone, PartialEq)]
pub enum Contents {
    Value(Value),
    Text(String),
    Lines(Vec<String>),
    Bytes(Vec<u8>),
}

impl Contents {
    /// Serialize any `Serialize` type into structured contents
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        let value = serde_json::to_value(value).context("Failed to convert value to JSON")?;
        Ok(Contents::Value(value))
    }

    /// Deserialize structured contents into `T`
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T> {
        let value = self
            .to_value()
            .ok_or_else(|| eyre::eyre!("Cannot deserialize {} contents", self.kind()))?;
        serde_json::from_value(value).context("Failed to deserialize config contents")
    }

    /// True for a JSON object, the "plain mapping" shape that defaults to
    /// pretty JSON when the file name says nothing else
    pub fn is_mapping(&self) -> bool {
        matches!(self, Contents::Value(Value::Object(_)))
    }

    /// View as a JSON value, converting text and lines where that is lossless
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Contents::Value(value) => Some(value.clone()),
            Contents::Text(text) => Some(Value::String(text.clone())),
            Contents::Lines(lines) => Some(Value::Array(
                lines.iter().cloned().map(Value::String).collect(),
            )),
            Contents::Bytes(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Contents::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Contents::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_lines(&self) -> Option<&[String]> {
        match self {
            Contents::Lines(lines) => Some(lines),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Contents::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Contents::Value(_) => "structured",
            Contents::Text(_) => "text",
            Contents::Lines(_) => "lines",
            Contents::Bytes(_) => "binary",
        }
    }
}

impl From<Value> for Contents {
    fn from(value: Value) -> Self {
        Contents::Value(value)
    }
}

impl From<String> for Contents {
    fn from(text: String) -> Self {
        Contents::Text(text)
    }
}

impl From<&str> for Contents {
    fn from(text: &str) -> Self {
        Contents::Text(text.to_string())
    }
}

impl From<Vec<String>> for Contents {
    fn from(lines: Vec<String>) -> Self {
        Contents::Lines(lines)
    }
}

impl From<Vec<u8>> for Contents {
    fn from(bytes: Vec<u8>) -> Self {
        Contents::Bytes(bytes)
    }
}
