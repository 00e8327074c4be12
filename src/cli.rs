use crate::format::{Codec, Contents, Format};
use crate::paths::Platform;
use crate::store::{ConfigStore, GetOptions, SaveOptions};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use eyre::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Where `save` takes its content from
#[derive(Debug, Clone)]
pub enum Input {
    Value(String),
    File(PathBuf),
    Stdin,
}

impl Input {
    fn read(&self) -> Result<Vec<u8>> {
        match self {
            Input::Value(text) => Ok(text.as_bytes().to_vec()),
            Input::File(path) => std::fs::read(path)
                .with_context(|| format!("Failed to read input file: {}", path.display())),
            Input::Stdin => {
                let mut buffer = Vec::new();
                std::io::stdin()
                    .read_to_end(&mut buffer)
                    .context("Failed to read stdin")?;
                Ok(buffer)
            }
        }
    }
}

/// Build a store for `app_name`, optionally pretending to run on `platform`
pub fn store_for(app_name: &str, platform: Option<Platform>) -> ConfigStore {
    let store = ConfigStore::new(app_name);
    match platform {
        Some(platform) => store.with_platform(platform),
        None => store,
    }
}

/// Read a config file, initializing it from `default_text` if given
///
/// `default_text` is parsed with the same format used to read the file.
pub fn read_config(
    store: &ConfigStore,
    file: &str,
    format: Option<Format>,
    default_text: Option<&str>,
) -> Result<Option<Contents>> {
    let codec: Codec = format.unwrap_or_else(|| Format::for_file(file)).into();
    let mut options = GetOptions::new().file(file);

    if let Some(format) = format {
        options = options.parser(format);
    }

    if let Some(text) = default_text {
        let default = codec
            .parse(text.as_bytes())
            .with_context(|| format!("Default contents are not valid {}", codec.name))?;
        options = options.default_contents(default);
    }

    log::debug!("Reading {} from {}", file, store.dir().display());
    store.get_with(&options)
}

/// Parse `input` and save it to `file`
///
/// The input is decoded with `input_format`, falling back to `format` and then
/// to the format implied by the file name. The result is written with
/// `format` or the store's default choice. Returns the number of bytes written.
pub fn write_config(
    store: &ConfigStore,
    file: &str,
    format: Option<Format>,
    input_format: Option<Format>,
    input: &Input,
) -> Result<usize> {
    let decode = input_format
        .or(format)
        .unwrap_or_else(|| Format::for_file(file));
    let raw = input.read()?;
    let contents = decode
        .parse(&raw)
        .with_context(|| format!("Input is not valid {}", decode))?;

    let mut options = SaveOptions::new().file(file);
    if let Some(format) = format {
        options = options.stringifier(format);
    }

    let written = store.save_with(&contents, &options)?;
    log::debug!("Encoded {} input as {} byte(s)", decode, written.len());

    Ok(written.len())
}

/// Render contents for a terminal
///
/// Structured values print as pretty JSON, text as-is, lines one per line and
/// binary data as base64.
pub fn render(contents: &Contents) -> Result<String> {
    Ok(match contents {
        Contents::Value(value) => serde_json::to_string_pretty(value)?,
        Contents::Text(text) => text.clone(),
        Contents::Lines(lines) => lines.join("\n"),
        Contents::Bytes(bytes) => STANDARD.encode(bytes),
    })
}

/// Source a dotenv file. A missing file is skipped; a malformed or unreadable
/// one is an error.
pub fn load_dotenv(path: &str) -> Result<Option<PathBuf>> {
    match dotenvy::from_filename(path) {
        Ok(loaded) => Ok(Some(loaded)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(e).with_context(|| format!("Failed to load env file: {}", path)),
    }
}

/// Delete `file`, or the whole config directory when no file is given
pub fn delete_config(store: &ConfigStore, file: Option<&Path>) -> Result<()> {
    match file {
        Some(file) => store.delete_file(file),
        None => store.delete(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn with_xdg(temp: &TempDir) -> ConfigStore {
        unsafe {
            std::env::set_var("XDG_CONFIG_HOME", temp.path());
        }
        store_for("cliapp", Some(Platform::Unix))
    }

    fn clear_xdg() {
        unsafe {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_store_for_uses_process_environment() {
        let temp = TempDir::new().unwrap();
        let store = with_xdg(&temp);

        assert_eq!(store.dir(), temp.path().join("cliapp"));

        clear_xdg();
    }

    #[test]
    #[serial_test::serial]
    fn test_write_then_read_yaml() {
        let temp = TempDir::new().unwrap();
        let store = with_xdg(&temp);

        let input = Input::Value(r#"{"name": "demo", "port": 8080}"#.to_string());
        let written = write_config(&store, "app.yaml", None, Some(Format::Json), &input).unwrap();
        assert!(written > 0);

        let on_disk = std::fs::read_to_string(temp.path().join("cliapp/app.yaml")).unwrap();
        assert!(on_disk.contains("name: demo"));

        let contents = read_config(&store, "app.yaml", None, None).unwrap().unwrap();
        assert_eq!(contents, Contents::Value(json!({"name": "demo", "port": 8080})));

        clear_xdg();
    }

    #[test]
    #[serial_test::serial]
    fn test_read_with_default_text() {
        let temp = TempDir::new().unwrap();
        let store = with_xdg(&temp);

        let contents = read_config(&store, "config.json", None, Some(r#"{"x": 1}"#))
            .unwrap()
            .unwrap();
        assert_eq!(contents, Contents::Value(json!({"x": 1})));
        assert!(temp.path().join("cliapp/config.json").exists());

        clear_xdg();
    }

    #[test]
    #[serial_test::serial]
    fn test_invalid_input_is_rejected() {
        let temp = TempDir::new().unwrap();
        let store = with_xdg(&temp);

        let input = Input::Value("{not json".to_string());
        let err = write_config(&store, "config.json", None, None, &input).unwrap_err();
        assert!(err.to_string().contains("PRETTY_JSON"));

        clear_xdg();
    }

    #[test]
    #[serial_test::serial]
    fn test_delete_config() {
        let temp = TempDir::new().unwrap();
        let store = with_xdg(&temp);

        let input = Input::Value("hello".to_string());
        write_config(&store, "notes.txt", None, None, &input).unwrap();
        delete_config(&store, Some(Path::new("notes.txt"))).unwrap();
        assert_eq!(store.list().unwrap(), Some(Vec::new()));

        delete_config(&store, None).unwrap();
        assert_eq!(store.list().unwrap(), None);

        clear_xdg();
    }

    #[test]
    fn test_render() {
        assert_eq!(
            render(&Contents::Value(json!({"a": 1}))).unwrap(),
            "{\n  \"a\": 1\n}"
        );
        assert_eq!(render(&Contents::from("plain")).unwrap(), "plain");
        assert_eq!(
            render(&Contents::Lines(vec!["a".into(), "b".into()])).unwrap(),
            "a\nb"
        );
        assert_eq!(render(&Contents::Bytes(b"hi".to_vec())).unwrap(), "aGk=");
    }

    #[test]
    fn test_load_dotenv_missing_file_is_skipped() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("absent.env");

        assert_eq!(load_dotenv(path.to_str().unwrap()).unwrap(), None);
    }

    #[test]
    fn test_load_dotenv_malformed_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.env");
        std::fs::write(&path, "BROKEN=\"unterminated\n").unwrap();

        let err = load_dotenv(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("broken.env"));
    }

    #[test]
    #[serial_test::serial]
    fn test_load_dotenv_sets_variables() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("good.env");
        std::fs::write(&path, "APPCONF_DOTENV_TEST=hello\n").unwrap();

        let loaded = load_dotenv(path.to_str().unwrap()).unwrap();
        assert_eq!(loaded.as_deref(), Some(path.as_path()));
        assert_eq!(std::env::var("APPCONF_DOTENV_TEST").unwrap(), "hello");

        unsafe {
            std::env::remove_var("APPCONF_DOTENV_TEST");
        }
    }
}
