//! Per-call options for reading and writing config files

use crate::format::{Codec, Contents};

/// File read or written when the caller does not name one
pub const DEFAULT_FILE: &str = "config.json";

/// Options for [`ConfigStore::get_with`](super::ConfigStore::get_with)
///
/// ```
/// use appconf::{Format, GetOptions};
/// use serde_json::json;
///
/// let options = GetOptions::new()
///     .file("settings.yaml")
///     .parser(Format::Yaml)
///     .default_contents(json!({"theme": "dark"}));
/// assert_eq!(options.file, "settings.yaml");
/// ```
#[derive(Debug, Clone)]
pub struct GetOptions {
    /// File name relative to the config directory
    pub file: String,
    /// Overrides the suffix-based format choice
    pub parser: Option<Codec>,
    /// Written to the file when it does not exist yet
    pub default_contents: Option<Contents>,
}

impl GetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    pub fn parser(mut self, parser: impl Into<Codec>) -> Self {
        self.parser = Some(parser.into());
        self
    }

    pub fn default_contents(mut self, contents: impl Into<Contents>) -> Self {
        self.default_contents = Some(contents.into());
        self
    }
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            file: DEFAULT_FILE.to_string(),
            parser: None,
            default_contents: None,
        }
    }
}

/// Options for [`ConfigStore::save_with`](super::ConfigStore::save_with)
#[derive(Debug, Clone)]
pub struct SaveOptions {
    pub file: String,
    /// Overrides the suffix- and shape-based format choice
    pub stringifier: Option<Codec>,
}

impl SaveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    pub fn stringifier(mut self, stringifier: impl Into<Codec>) -> Self {
        self.stringifier = Some(stringifier.into());
        self
    }
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            file: DEFAULT_FILE.to_string(),
            stringifier: None,
        }
    }
}
