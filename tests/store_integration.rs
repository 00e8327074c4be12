//! Integration tests for the config store
//!
//! Each test points the store at a temporary XDG config home so the real
//! user configuration is never touched.

use appconf::{ConfigStore, Contents, Environment, Format, GetOptions, Platform, SaveOptions};
use eyre::Result;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tempfile::TempDir;

fn isolated_store(temp: &TempDir, app: &str) -> ConfigStore {
    let env = Environment::default()
        .with_home(temp.path().join("home"))
        .with_xdg_config_home(temp.path().join("config"));
    ConfigStore::new(app)
        .with_platform(Platform::Unix)
        .with_environment(env)
}

#[test]
fn test_save_then_get_round_trips_every_structured_format() -> Result<()> {
    let temp = TempDir::new()?;
    let store = isolated_store(&temp, "roundtrip");

    let value = json!({"name": "demo", "window": {"width": "800", "maximized": false}});

    for file in ["a.json", "a.yaml", "a.yml", "a.ini"] {
        store.save_file(file, value.clone())?;
        let read = store.get_file(file)?;
        assert_eq!(read, Some(Contents::Value(value.clone())), "{}", file);
    }

    let options = SaveOptions::new().file("compact.json").stringifier(Format::Json);
    store.save_with(&value.clone().into(), &options)?;
    assert_eq!(store.get_file("compact.json")?, Some(Contents::Value(value)));

    Ok(())
}

#[test]
fn test_text_lines_and_binary_files() -> Result<()> {
    let temp = TempDir::new()?;
    let store = isolated_store(&temp, "raw");

    store.save_file("motd", "welcome\n")?;
    assert_eq!(store.get_file("motd")?, Some(Contents::from("welcome\n")));

    let lines = vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()];
    let save = SaveOptions::new().file("peers.list").stringifier(Format::Lines);
    store.save_with(&Contents::Lines(lines.clone()), &save)?;
    let get = GetOptions::new().file("peers.list").parser(Format::Lines);
    assert_eq!(store.get_with(&get)?, Some(Contents::Lines(lines)));

    let blob: Vec<u8> = vec![0xde, 0xad, 0xbe, 0xef, 0x00];
    store.save_file("key.bin", blob.clone())?;
    assert_eq!(store.get_file("key.bin")?, Some(Contents::Bytes(blob)));

    Ok(())
}

#[test]
fn test_default_contents_initialize_once() -> Result<()> {
    let temp = TempDir::new()?;
    let store = isolated_store(&temp, "defaults");

    assert_eq!(store.get()?, None);

    let first = store.get_or_init("config.json", json!({"x": 1}))?;
    assert_eq!(first, Contents::Value(json!({"x": 1})));

    // Plain get sees the initialized file
    assert_eq!(store.get()?, Some(Contents::Value(json!({"x": 1}))));

    // A later default does not overwrite
    let again = store.get_or_init("config.json", json!({"x": 2}))?;
    assert_eq!(again, Contents::Value(json!({"x": 1})));

    Ok(())
}

#[test]
fn test_yaml_default_written_as_yaml() -> Result<()> {
    let temp = TempDir::new()?;
    let store = isolated_store(&temp, "yamldefault");

    store.get_or_init("settings.yaml", json!({"theme": "dark"}))?;
    let on_disk = std::fs::read_to_string(store.file_path("settings.yaml"))?;
    assert_eq!(on_disk.trim(), "theme: dark");

    Ok(())
}

#[test]
fn test_list_create_and_delete_lifecycle() -> Result<()> {
    let temp = TempDir::new()?;
    let store = isolated_store(&temp, "lifecycle");

    assert_eq!(store.list()?, None);

    store.create()?;
    store.create()?;
    assert_eq!(store.list()?, Some(Vec::new()));

    store.save(json!({"a": 1}))?;
    assert_eq!(store.list()?, Some(vec!["config.json".to_string()]));

    store.delete_file("missing.json")?;
    assert_eq!(store.list()?, Some(vec!["config.json".to_string()]));

    store.delete()?;
    assert_eq!(store.list()?, None);
    store.delete()?;

    Ok(())
}

#[test]
fn test_apps_are_isolated() -> Result<()> {
    let temp = TempDir::new()?;
    let first = isolated_store(&temp, "first");
    let second = isolated_store(&temp, "second");

    first.save(json!({"owner": "first"}))?;
    assert_eq!(second.get()?, None);

    second.delete()?;
    assert!(first.get()?.is_some());

    Ok(())
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct EditorSettings {
    theme: String,
    tab_width: u8,
    recent: Vec<String>,
}

#[test]
fn test_typed_settings() -> Result<()> {
    let temp = TempDir::new()?;
    let store = isolated_store(&temp, "editor");

    let settings = EditorSettings {
        theme: "solarized".to_string(),
        tab_width: 4,
        recent: vec!["main.rs".to_string()],
    };

    store.save_file("editor.yaml", Contents::from_serialize(&settings)?)?;
    let loaded: EditorSettings = store
        .get_file("editor.yaml")?
        .expect("file was just saved")
        .deserialize()?;

    assert_eq!(loaded, settings);

    Ok(())
}

#[test]
fn test_malformed_file_is_an_error() -> Result<()> {
    let temp = TempDir::new()?;
    let store = isolated_store(&temp, "broken");

    store.create()?;
    std::fs::write(store.file_path("config.yaml"), "key: [unterminated")?;
    assert!(store.get_file("config.yaml").is_err());

    std::fs::write(store.file_path("config.json"), "{\"a\": }")?;
    assert!(store.get().is_err());

    Ok(())
}
