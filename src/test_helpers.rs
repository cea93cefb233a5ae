//! Shared test utilities.
//!
//! Builds raw rows from JSON literals and writes data/config fixtures into
//! temp directories.
//!
//! # Usage
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let source = VecSource(rows(json!([{"username": "a"}, {}])));
//! let tmp = site_dir(r#"[site]
//! title = "Team""#, Some(("users.json", r#"[{"username": "a"}]"#)));
//! ```

use crate::types::RawRecord;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Turn a JSON array of objects into raw rows. Panics on any other shape.
pub fn rows(value: Value) -> Vec<RawRecord> {
    let Value::Array(items) = value else {
        panic!("rows() expects a JSON array, got {value}");
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => map,
            other => panic!("rows() expects objects, got {other}"),
        })
        .collect()
}

/// One row per entry: `Some(name)` sets `username`, `None` leaves it out.
pub fn username_rows(names: &[Option<String>]) -> Vec<RawRecord> {
    names
        .iter()
        .map(|name| {
            let mut row = RawRecord::new();
            match name {
                Some(name) => row.insert("username".into(), Value::from(name.as_str())),
                None => row.insert("email".into(), Value::from("someone@example.com")),
            };
            row
        })
        .collect()
}

/// Usernames drawn from a small alphabet so generated rows repeat names.
pub fn username_column() -> impl proptest::strategy::Strategy<Value = Vec<Option<String>>> {
    proptest::collection::vec(proptest::option::of("[a-c]{0,3}"), 0..12)
}

/// A temp directory with a `config.toml` and an optional data file.
pub fn site_dir(config_toml: &str, data: Option<(&str, &str)>) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("config.toml"), config_toml).unwrap();
    if let Some((name, content)) = data {
        fs::write(tmp.path().join(name), content).unwrap();
    }
    tmp
}
