//! Configuration file upgrades: fill in keys added by newer releases.

use super::{Config, default_busy_timeout_ms, default_source, default_timezone};
use crate::errors::{AppError, AppResult};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

fn defaults() -> Vec<(&'static str, Value)> {
    vec![
        ("timezone", Value::String(default_timezone())),
        ("default_source", Value::String(default_source())),
        ("busy_timeout_ms", Value::Number(default_busy_timeout_ms().into())),
    ]
}

/// Add missing keys (with their defaults) to a parsed config mapping.
/// Returns the names of the keys that were added.
pub fn fill_missing_keys(map: &mut Mapping) -> Vec<String> {
    let mut added = Vec::new();
    for (key, value) in defaults() {
        let k = Value::String(key.to_string());
        if !map.contains_key(&k) {
            map.insert(k, value);
            added.push(key.to_string());
        }
    }
    added
}

/// Check the config file at `path` and rewrite it with any missing keys.
pub fn check_config_file(path: &Path) -> AppResult<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;

    let mut yaml: Value = serde_yaml::from_str(&content)
        .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
    let map = yaml
        .as_mapping_mut()
        .ok_or_else(|| AppError::Config("configuration root must be a mapping".into()))?;

    if !map.contains_key(Value::String("database".into())) {
        map.insert(
            Value::String("database".into()),
            Value::String(Config::database_file().to_string_lossy().to_string()),
        );
    }

    let added = fill_missing_keys(map);

    if !added.is_empty() {
        let serialized = serde_yaml::to_string(&yaml).map_err(|_| AppError::ConfigSave)?;
        fs::write(path, serialized).map_err(|_| AppError::ConfigSave)?;
    }

    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_absent_keys_are_added() {
        let mut map: Mapping =
            serde_yaml::from_str("database: /tmp/a.sqlite\ntimezone: Europe/Rome\n").unwrap();
        let added = fill_missing_keys(&mut map);
        assert_eq!(added, vec!["default_source", "busy_timeout_ms"]);
        assert_eq!(
            map.get(Value::String("timezone".into())),
            Some(&Value::String("Europe/Rome".into()))
        );
        assert!(fill_missing_keys(&mut map).is_empty());
    }
}
