//! Mapping metadata: how a raw row becomes a domain object.
//!
//! Each model describes itself with an [`EntityMetadata`] value that is handed
//! to the repository constructor. It names the identifier field(s) used for
//! keyed lookups and decides how hydration treats missing fields.
//!
//! ## Field Coercion
//!
//! Raw values are scalars of any JSON type. String fields are read with
//! [`string_field`], which applies these rules:
//!
//! | Raw value | Result |
//! |-----------|--------|
//! | missing / `null` | `""` (lenient) or [`HydrateError::MissingField`] (strict) |
//! | `"text"` | `"text"` |
//! | `42`, `1.5` | `"42"`, `"1.5"` |
//! | `1.0`, `-3.0` | `"1"`, `"-3"` (integral floats drop the `.0`) |
//! | `1e25` | exponent form as printed by `serde_json`, not `"1.0E+25"` |
//! | `true` / `false` | `"1"` / `""` |
//! | array / object | compact JSON text |

use crate::types::RawRecord;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HydrateError {
    #[error("Row {row}: required field '{field}' is missing")]
    MissingField { field: String, row: usize },
}

/// Mapping configuration for one model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    /// Field(s) that address an object within its repository.
    pub identifier: Vec<String>,
    /// Fail hydration on missing fields instead of defaulting them.
    pub strict: bool,
}

impl EntityMetadata {
    pub fn new<I, S>(identifier: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            identifier: identifier.into_iter().map(Into::into).collect(),
            strict: false,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn is_identifier(&self, field: &str) -> bool {
        self.identifier.iter().any(|f| f == field)
    }
}

/// Read `field` from `raw` as a string.
///
/// `row` is the zero-based source position, used only in error messages.
pub fn string_field(
    raw: &RawRecord,
    field: &str,
    row: usize,
    metadata: &EntityMetadata,
) -> Result<String, HydrateError> {
    match raw.get(field) {
        None | Some(Value::Null) if metadata.strict => Err(HydrateError::MissingField {
            field: field.to_string(),
            row,
        }),
        None | Some(Value::Null) => Ok(String::new()),
        Some(value) => Ok(coerce_to_string(value)),
    }
}

/// Stringify a non-null raw value.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "1".to_string(),
        Value::Bool(false) => String::new(),
        Value::Number(n) => number_text(n),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Integral floats below 1e15 print without a fractional part, so a row
/// written as `7.0` addresses the same user as one written as `7`.
fn number_text(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => (f as i64).to_string(),
        _ => n.to_string(),
    }
}
