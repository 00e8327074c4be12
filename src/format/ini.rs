//! INI codec
//!
//! Keys outside any section become top-level entries, `[section]` becomes a
//! nested object and dotted section names (`[a.b]`) nest further. All INI
//! values are strings except the literals `true`, `false` and `null`.

use ::ini::Ini;
use eyre::{Context, Result};
use serde_json::{Map, Value};

pub(crate) fn parse(text: &str) -> Result<Value> {
    let ini = Ini::load_from_str(text).context("Failed to parse INI")?;
    let mut root = Map::new();

    for (section, properties) in ini.iter() {
        let target = match section {
            None => &mut root,
            Some(name) => section_mut(&mut root, name)?,
        };

        for (key, value) in properties.iter() {
            target.insert(key.to_string(), parse_scalar(value));
        }
    }

    Ok(Value::Object(root))
}

pub(crate) fn stringify(value: &Value) -> Result<String> {
    let Value::Object(root) = value else {
        eyre::bail!("INI contents must be an object, got {}", type_name(value));
    };

    let mut ini = Ini::new();
    write_section(&mut ini, None, root)?;

    let mut buffer = Vec::new();
    ini.write_to(&mut buffer).context("Failed to write INI")?;
    Ok(String::from_utf8(buffer)?)
}

fn write_section(ini: &mut Ini, name: Option<&str>, object: &Map<String, Value>) -> Result<()> {
    // Header is written even for an empty object so the key survives
    if let Some(name) = name {
        ini.entry(Some(name.to_string())).or_insert_with(Default::default);
    }

    // Scalars first so they land under this section's header
    for (key, value) in object {
        if value.is_object() {
            continue;
        }
        let scalar = stringify_scalar(key, value)?;
        ini.with_section(name).set(key.as_str(), scalar);
    }

    for (key, value) in object {
        if let Value::Object(child) = value {
            let child_name = match name {
                Some(parent) => format!("{}.{}", parent, key),
                None => key.clone(),
            };
            write_section(ini, Some(&child_name), child)?;
        }
    }

    Ok(())
}

fn section_mut<'a>(
    root: &'a mut Map<String, Value>,
    name: &str,
) -> Result<&'a mut Map<String, Value>> {
    let mut current = root;
    for part in name.split('.') {
        let entry = current
            .entry(part.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        current = match entry {
            Value::Object(map) => map,
            _ => eyre::bail!("INI section [{}] collides with a key named {}", name, part),
        };
    }
    Ok(current)
}

fn parse_scalar(raw: &str) -> Value {
    match raw {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "null" => Value::Null,
        other => Value::String(other.to_string()),
    }
}

fn stringify_scalar(key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) if needs_quoting(s) => Ok(quote(s)),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok("null".to_string()),
        Value::Array(_) | Value::Object(_) => {
            eyre::bail!("INI cannot represent {} value for key {}", type_name(value), key)
        }
    }
}

// The loader trims bare values and strips a leading quote pair
fn needs_quoting(s: &str) -> bool {
    s.starts_with(char::is_whitespace)
        || s.ends_with(char::is_whitespace)
        || s.starts_with(['"', '\''])
}

/// Wrap `s` in double quotes, emitting embedded `"` as `'"'` chunks. The
/// loader concatenates adjacent quoted chunks back into one value.
fn quote(s: &str) -> String {
    s.split('"')
        .map(|chunk| match chunk {
            "" => String::new(),
            chunk => format!("\"{}\"", chunk),
        })
        .collect::<Vec<_>>()
        .join("'\"'")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_sections() {
        let text = "name = demo\n\n[server]\nhost = localhost\nport = 8080\n\n[server.tls]\nenabled = true\n";
        let value = parse(text).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "demo",
                "server": {
                    "host": "localhost",
                    "port": "8080",
                    "tls": {"enabled": true}
                }
            })
        );
    }

    #[test]
    fn test_round_trip_strings_and_sections() {
        let value = json!({
            "user": "alice",
            "debug": false,
            "paths": {"cache": "/tmp/cache", "logs": "/var/log/app"},
            "db": {"primary": {"url": "postgres://localhost"}}
        });

        let text = stringify(&value).unwrap();
        assert!(text.contains("[paths]"));
        assert!(text.contains("[db.primary]"));
        assert_eq!(parse(&text).unwrap(), value);
    }

    #[test]
    fn test_numbers_come_back_as_strings() {
        let text = stringify(&json!({"retries": 3})).unwrap();
        assert_eq!(parse(&text).unwrap(), json!({"retries": "3"}));
    }

    #[test]
    fn test_rejects_non_object() {
        let err = stringify(&json!(["a"])).unwrap_err();
        assert!(err.to_string().contains("must be an object"));
    }

    #[test]
    fn test_rejects_arrays() {
        let err = stringify(&json!({"list": [1, 2]})).unwrap_err();
        assert!(err.to_string().contains("list"));
    }

    #[test]
    fn test_round_trip_empty_section() {
        let value = json!({"a": "1", "empty": {}, "outer": {"inner": {}}});
        let text = stringify(&value).unwrap();
        assert!(text.contains("[empty]"));
        assert!(text.contains("[outer.inner]"));
        assert_eq!(parse(&text).unwrap(), value);
    }

    #[test]
    fn test_round_trip_padding_and_quotes() {
        let value = json!({
            "padded": "  padded  ",
            "tab": "\tlead",
            "quoted": "\"quoted\"",
            "single": "'single'",
            "mixed": "\"it's\" here ",
            "inner": "say \"hi\"",
            "lone": "\""
        });

        let text = stringify(&value).unwrap();
        assert!(text.contains("padded=\"  padded  \""));
        assert_eq!(parse(&text).unwrap(), value);
    }

    #[test]
    fn test_plain_values_stay_bare() {
        let text = stringify(&json!({"name": "demo app"})).unwrap();
        assert_eq!(text.trim(), "name=demo app");
    }

    #[test]
    fn test_section_collision() {
        let err = parse("a = 1\n[a]\nb = 2\n").unwrap_err();
        assert!(err.to_string().contains("collides"));
    }
}
