// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Structured-data persistence
//!
//! Every file written here is indented JSON so it can be inspected by hand.
//! Loaders that expect a particular container kind fail with
//! [`Error::ShapeMismatch`] instead of coercing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, ErrorContext, Result};

/// Serialize `value` as indented JSON into `path`, creating parent directories
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load any JSON value from `path`
pub fn load_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    serde_json::from_str::<Value>(&content).context(&format!("parsing {}", path.display()))
}

/// Load a JSON object from `path`
pub fn load_map(path: &Path) -> Result<Map<String, Value>> {
    match load_value(path)? {
        Value::Object(map) => Ok(map),
        other => Err(Error::shape_mismatch(path, "object", kind_of(&other))),
    }
}

/// Load a JSON array from `path`
pub fn load_list(path: &Path) -> Result<Vec<Value>> {
    match load_value(path)? {
        Value::Array(list) => Ok(list),
        other => Err(Error::shape_mismatch(path, "array", kind_of(&other))),
    }
}

/// Load a flat string-to-string object from `path`
///
/// Scalar values are kept in their JSON text form; nested containers are rejected.
pub fn load_string_map(path: &Path) -> Result<BTreeMap<String, String>> {
    let mut result = BTreeMap::new();
    for (key, value) in load_map(path)? {
        let value = match value {
            Value::String(s) => s,
            Value::Array(_) | Value::Object(_) => {
                return Err(Error::shape_mismatch(path, "string value", kind_of(&value)));
            }
            scalar => scalar.to_string(),
        };
        result.insert(key, value);
    }
    Ok(result)
}

/// Delete a file if it exists. Returns true once the file is gone.
pub fn file_del(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }
    Ok(!path.is_file())
}

/// Create a directory and all missing parents
pub fn dir_create(path: &Path) -> Result<bool> {
    fs::create_dir_all(path)?;
    Ok(path.is_dir())
}

/// Delete a directory tree, optionally keeping the (emptied) root
pub fn dir_del(path: &Path, keep_root: bool) -> Result<bool> {
    if !path.is_dir() {
        return Ok(true);
    }
    if keep_root {
        for entry in fs::read_dir(path)? {
            let entry_path = entry?.path();
            if entry_path.is_dir() {
                fs::remove_dir_all(&entry_path)?;
            } else {
                fs::remove_file(&entry_path)?;
            }
        }
    } else {
        fs::remove_dir_all(path)?;
    }
    Ok(path.is_dir() == keep_root)
}

/// Name of a JSON value's kind, for error messages
pub(crate) fn kind_of(value: &Value) -> &'static str {
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
    use tempfile::TempDir;

    #[test]
    fn test_save_load_map() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("nested").join("data.json");

        let content = json!({"name": "Ben", "age": 24, "float": 123.456});
        save_json(&file, &content).unwrap();

        let raw = fs::read_to_string(&file).unwrap();
        assert!(raw.contains("\n  \"age\""), "output should be indented");

        let loaded = load_map(&file).unwrap();
        assert_eq!(Value::Object(loaded), content);
    }

    #[test]
    fn test_shape_mismatch() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("list.json");
        save_json(&file, &json!([1, 2, 3])).unwrap();

        let err = load_map(&file).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                expected: "object",
                found: "array",
                ..
            }
        ));
        assert_eq!(load_list(&file).unwrap().len(), 3);
    }

    #[test]
    fn test_load_string_map() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("cookies.json");
        save_json(&file, &json!({"name": "Ben", "age": 25})).unwrap();

        let map = load_string_map(&file).unwrap();
        assert_eq!(map["name"], "Ben");
        assert_eq!(map["age"], "25");

        save_json(&file, &json!({"nested": {"a": 1}})).unwrap();
        assert!(load_string_map(&file).is_err());
    }

    #[test]
    fn test_file_and_dir_del() {
        let dir = TempDir::new().unwrap();
        let child = dir.path().join("child");
        assert!(dir_create(&child).unwrap());

        let file = child.join("test.file");
        save_json(&file, &json!({})).unwrap();
        assert!(file_del(&file).unwrap());
        assert!(file_del(&file).unwrap());

        save_json(&file, &json!({})).unwrap();
        assert!(dir_del(&child, true).unwrap());
        assert!(child.is_dir());
        assert!(!file.exists());

        assert!(dir_del(&child, false).unwrap());
        assert!(!child.exists());
    }
}
