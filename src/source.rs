//! Data sources: where raw rows come from.
//!
//! A [`DataSource`] hands the repository an ordered list of [`RawRecord`]s.
//! Order is significant: it becomes the iteration order of the repository and
//! therefore the order of render requests and of the listing page.
//!
//! Two sources ship with the crate:
//!
//! | Source | Backing store |
//! |--------|---------------|
//! | [`StaticUsers`] | Built-in three-user dataset, never fails |
//! | [`FileSource`] | A `.json` array of objects, or a `.toml` file with `[[rows]]` |
//!
//! ## Data File Formats
//!
//! ```text
//! users.json                     users.toml
//! [                              [[rows]]
//!   {"username": "jwage"},       username = "jwage"
//!   {"username": "ocramius"}
//! ]                              [[rows]]
//!                                username = "ocramius"
//! ```

use crate::types::RawRecord;
use serde::Deserialize;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataSourceError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Unexpected data shape in {path}: {message}")]
    Shape { path: PathBuf, message: String },
    #[error("Unsupported data file format: {0} (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),
}

/// Anything that can produce an ordered sequence of raw rows.
pub trait DataSource {
    fn source_rows(&self) -> Result<Vec<RawRecord>, DataSourceError>;
}

impl<S: DataSource + ?Sized> DataSource for &S {
    fn source_rows(&self) -> Result<Vec<RawRecord>, DataSourceError> {
        (**self).source_rows()
    }
}

impl<S: DataSource + ?Sized> DataSource for Box<S> {
    fn source_rows(&self) -> Result<Vec<RawRecord>, DataSourceError> {
        (**self).source_rows()
    }
}

/// The built-in user list.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticUsers;

impl DataSource for StaticUsers {
    fn source_rows(&self) -> Result<Vec<RawRecord>, DataSourceError> {
        Ok(["jwage", "ocramius", "ccovey"]
            .into_iter()
            .map(|name| {
                let mut row = RawRecord::new();
                row.insert("username".into(), json!(name));
                row
            })
            .collect())
    }
}

/// In-memory rows, mostly useful for tests and for embedding the pipeline.
#[derive(Debug, Clone, Default)]
pub struct VecSource(pub Vec<RawRecord>);

impl DataSource for VecSource {
    fn source_rows(&self) -> Result<Vec<RawRecord>, DataSourceError> {
        Ok(self.0.clone())
    }
}

/// Rows read from a data file. The format is picked from the extension.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

#[derive(Deserialize)]
struct TomlRows {
    rows: Vec<toml::Value>,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<String, DataSourceError> {
        fs::read_to_string(&self.path).map_err(|source| DataSourceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn shape_error(&self, message: impl Into<String>) -> DataSourceError {
        DataSourceError::Shape {
            path: self.path.clone(),
            message: message.into(),
        }
    }

    fn rows_from_values(&self, values: Vec<Value>) -> Result<Vec<RawRecord>, DataSourceError> {
        values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| match value {
                Value::Object(row) => Ok(row),
                other => Err(self.shape_error(format!(
                    "row {idx} is {}, expected an object",
                    value_kind(&other)
                ))),
            })
            .collect()
    }

    fn parse_json(&self, content: &str) -> Result<Vec<RawRecord>, DataSourceError> {
        match serde_json::from_str::<Value>(content)? {
            Value::Array(values) => self.rows_from_values(values),
            other => Err(self.shape_error(format!(
                "top level is {}, expected an array of objects",
                value_kind(&other)
            ))),
        }
    }

    fn parse_toml(&self, content: &str) -> Result<Vec<RawRecord>, DataSourceError> {
        let doc: TomlRows = toml::from_str(content)?;
        self.rows_from_values(doc.rows.into_iter().map(toml_to_json).collect())
    }
}

impl DataSource for FileSource {
    fn source_rows(&self) -> Result<Vec<RawRecord>, DataSourceError> {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let rows = match ext.as_deref() {
            Some("json") => self.parse_json(&self.read()?)?,
            Some("toml") => self.parse_toml(&self.read()?)?,
            _ => return Err(DataSourceError::UnsupportedFormat(self.path.clone())),
        };
        tracing::debug!(path = %self.path.display(), rows = rows.len(), "read data file");
        Ok(rows)
    }
}

/// Convert a TOML value into the JSON model rows are carried in.
///
/// Dates and times become their RFC 3339 text, the same string TOML would
/// print for them.
fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(d) => Value::String(d.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, value)| (key, toml_to_json(value)))
                .collect(),
        ),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
