//! A module responsible for the file system operations.
use super::{GridDocument, ScenarioSet};

use std::path::{Path, PathBuf};

fn invalid_data<E>(e: E) -> std::io::Error
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    std::io::Error::new(std::io::ErrorKind::InvalidData, e)
}

/// Parse a document as JSON if the path has a `.json` extension, as YAML otherwise.
pub fn parse_document<P: AsRef<Path>>(content: &str, path: P) -> std::io::Result<serde_json::Value> {
    let is_json = path
        .as_ref()
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        serde_json::from_str(content).map_err(invalid_data)
    } else {
        serde_yaml::from_str(content).map_err(invalid_data)
    }
}

/// Read and parse a JSON or YAML document from the given path.
pub fn read_document<P: AsRef<Path>>(path: P) -> std::io::Result<serde_json::Value> {
    let content = std::fs::read_to_string(&path)?;
    parse_document(&content, path)
}

/// Given a `serde_json::Value`, read it from the path it specifies if it's a string,
/// relative to the given `path`.
pub fn read_json_value_from_file<P: AsRef<Path>>(
    value: &mut serde_json::Value,
    path: P,
) -> std::io::Result<bool> {
    if let serde_json::Value::String(s) = value {
        let mut document_path = PathBuf::new();
        document_path.push(path);
        document_path.pop();
        document_path.push(s);
        *value = read_document(&document_path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

/// Given a `serde_json::Value`, read its given `field` from the path it specifies if it's a
/// string, relative to the given `path`.
pub fn read_field_from_file<P: AsRef<Path>>(
    value: &mut serde_json::Value,
    field: &str,
    path: P,
) -> std::io::Result<bool> {
    let field = value.get_mut(field);
    if let Some(v) = field {
        read_json_value_from_file(v, path)
    } else {
        Ok(false)
    }
}

impl GridDocument {
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> std::io::Result<GridDocument> {
        let value = read_document(&path)?;
        let grid: GridDocument = serde_json::from_value(value)?;
        Ok(grid)
    }
}

impl ScenarioSet {
    pub fn read_from_file<P: AsRef<Path>>(path: P) -> std::io::Result<ScenarioSet> {
        let mut value = read_document(&path)?;
        read_field_from_file(&mut value, "grid", &path)?;
        read_field_from_file(&mut value, "config", &path)?;
        let set: ScenarioSet = serde_json::from_value(value)?;
        Ok(set)
    }
}
