//! Serialization utilities with robust error handling.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializes data to compact JSON.
pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Serializes data to pretty-printed JSON.
pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes data from a JSON string. Blank input is a validation error.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

/// Writes pretty JSON to `path`, creating parent directories as needed.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, to_json_pretty(data)?)?;
    Ok(())
}

/// Reads and deserializes a JSON file. A missing file is `NotFound`.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Err(IoError::not_found(path.display().to_string()));
    }
    from_json(&std::fs::read_to_string(path)?)
}
