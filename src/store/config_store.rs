//! Per-application config store

use super::directory;
use super::options::{DEFAULT_FILE, GetOptions, SaveOptions};
use crate::format::{Codec, Contents, Format};
use crate::paths::{self, Environment, Platform};
use eyre::{Context, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads and writes config files for one application
///
/// The directory is resolved again on every call, so changes to
/// `XDG_CONFIG_HOME` or `APPDATA` take effect immediately. Every operation is
/// a single blocking filesystem call sequence with no locking; concurrent
/// writers race at the filesystem level.
///
/// # Example
///
/// ```no_run
/// use appconf::ConfigStore;
/// use serde_json::json;
///
/// let store = ConfigStore::new("myapp");
/// store.save(json!({"theme": "dark"}))?;
/// let config = store.get()?;
/// # Ok::<(), eyre::Report>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigStore {
    app_name: String,
    platform: Platform,
    env: Option<Environment>,
}

impl ConfigStore {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            platform: Platform::current(),
            env: None,
        }
    }

    /// Resolve directories using another platform's convention
    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Resolve directories against a fixed environment instead of the
    /// live process environment
    pub fn with_environment(mut self, env: Environment) -> Self {
        self.env = Some(env);
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The application's config directory
    pub fn dir(&self) -> PathBuf {
        match &self.env {
            Some(env) => paths::resolve_directory(&self.app_name, self.platform, env),
            None => paths::resolve_directory(
                &self.app_name,
                self.platform,
                &Environment::from_process(),
            ),
        }
    }

    /// Path of `file` inside the config directory
    pub fn file_path(&self, file: impl AsRef<Path>) -> PathBuf {
        self.dir().join(file)
    }

    /// Make sure the config directory exists
    pub fn create(&self) -> Result<()> {
        directory::ensure_dir(&self.dir())
    }

    /// Read `config.json`
    pub fn get(&self) -> Result<Option<Contents>> {
        self.get_with(&GetOptions::default())
    }

    /// Read `file` using the format its suffix implies
    pub fn get_file(&self, file: impl Into<String>) -> Result<Option<Contents>> {
        self.get_with(&GetOptions::new().file(file))
    }

    /// Read `file`, writing `default_contents` first if it does not exist
    pub fn get_or_init(
        &self,
        file: impl Into<String>,
        default_contents: impl Into<Contents>,
    ) -> Result<Contents> {
        let options = GetOptions::new()
            .file(file)
            .default_contents(default_contents);
        let contents = self.get_with(&options)?;
        contents.ok_or_else(|| eyre::eyre!("Config file missing after initialization"))
    }

    /// Read a config file
    ///
    /// Returns `Ok(None)` when the file does not exist and no default was
    /// given. With a default, the default is saved and the written bytes are
    /// parsed back, so this call returns exactly what later reads will.
    /// Other I/O failures and parse failures are errors.
    pub fn get_with(&self, options: &GetOptions) -> Result<Option<Contents>> {
        let path = self.file_path(&options.file);
        let codec = options
            .parser
            .unwrap_or_else(|| Format::for_file(&options.file).into());

        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let Some(default) = &options.default_contents else {
                    log::debug!("Config file not found: {}", path.display());
                    return Ok(None);
                };

                log::info!("Initializing {} with defaults", path.display());
                let save_options = SaveOptions {
                    file: options.file.clone(),
                    stringifier: options.parser,
                };
                let written = self.save_with(default, &save_options)?;
                return parse_with(&codec, &written, &path).map(Some);
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read config file: {}", path.display()));
            }
        };

        parse_with(&codec, &bytes, &path).map(Some)
    }

    /// Write `contents` to `config.json` as pretty JSON
    pub fn save(&self, contents: impl Into<Contents>) -> Result<Vec<u8>> {
        let options = SaveOptions::new()
            .file(DEFAULT_FILE)
            .stringifier(Format::PrettyJson);
        self.save_with(&contents.into(), &options)
    }

    /// Write `contents` to `file` using the format its suffix implies
    pub fn save_file(
        &self,
        file: impl Into<String>,
        contents: impl Into<Contents>,
    ) -> Result<Vec<u8>> {
        self.save_with(&contents.into(), &SaveOptions::new().file(file))
    }

    /// Write a config file, creating the config directory if needed
    ///
    /// Format choice: an explicit stringifier wins, then the file suffix, then
    /// pretty JSON for mappings, then `ID`. Returns the bytes written.
    pub fn save_with(&self, contents: &Contents, options: &SaveOptions) -> Result<Vec<u8>> {
        self.create()?;

        let codec: Codec = options
            .stringifier
            .unwrap_or_else(|| Format::for_save(&options.file, contents).into());
        let path = self.file_path(&options.file);
        log::debug!("Saving {} as {}", path.display(), codec.name);

        let bytes = codec
            .stringify(contents)
            .with_context(|| format!("Failed to encode config file: {}", path.display()))?;
        std::fs::write(&path, &bytes)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(bytes)
    }

    /// Names of the entries in the config directory, or `None` if it does
    /// not exist
    pub fn list(&self) -> Result<Option<Vec<String>>> {
        directory::list_entries(&self.dir())
    }

    /// Remove the whole config directory
    pub fn delete(&self) -> Result<()> {
        directory::remove_path(&self.dir())
    }

    /// Remove one file (or subdirectory) from the config directory
    pub fn delete_file(&self, file: impl AsRef<Path>) -> Result<()> {
        directory::remove_path(&self.file_path(file))
    }
}

fn parse_with(codec: &Codec, bytes: &[u8], path: &Path) -> Result<Contents> {
    codec.parse(bytes).with_context(|| {
        format!(
            "Failed to parse config file as {}: {}",
            codec.name,
            path.display()
        )
    })
}
