//! Domain models and the [`Hydrate`] contract the repository relies on.

use crate::metadata::{self, EntityMetadata, HydrateError};
use crate::types::RawRecord;
use serde::Serialize;

/// A model that can be built from a raw row and queried by field name.
pub trait Hydrate: Sized {
    /// Default mapping for this model.
    fn metadata() -> EntityMetadata;

    /// Build an object from `raw`, the `row`-th record of its source.
    fn hydrate(raw: &RawRecord, row: usize, metadata: &EntityMetadata)
    -> Result<Self, HydrateError>;

    /// Value of a mapped field, as used by criteria lookups.
    fn field(&self, name: &str) -> Option<&str>;

    /// Identifier values in the order the metadata lists them.
    fn identity(&self, metadata: &EntityMetadata) -> Vec<String> {
        metadata
            .identifier
            .iter()
            .map(|f| self.field(f).unwrap_or_default().to_string())
            .collect()
    }
}

/// A site user. The username doubles as the identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    username: String,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl Hydrate for User {
    fn metadata() -> EntityMetadata {
        EntityMetadata::new(["username"])
    }

    fn hydrate(
        raw: &RawRecord,
        row: usize,
        metadata: &EntityMetadata,
    ) -> Result<Self, HydrateError> {
        Ok(Self {
            username: metadata::string_field(raw, "username", row, metadata)?,
        })
    }

    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "username" => Some(&self.username),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: serde_json::Value) -> RawRecord {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn hydrate_sets_username() {
        let user = User::hydrate(&raw(json!({"username": "ocramius"})), 0, &User::metadata())
            .unwrap();
        assert_eq!(user.username(), "ocramius");
    }

    #[test]
    fn hydrate_ignores_unknown_fields() {
        let user = User::hydrate(
            &raw(json!({"username": "jwage", "name": "Jonathan"})),
            0,
            &User::metadata(),
        )
        .unwrap();
        assert_eq!(user, User::new("jwage"));
    }

    #[test]
    fn hydrate_missing_username_is_empty() {
        let user = User::hydrate(&raw(json!({})), 0, &User::metadata()).unwrap();
        assert_eq!(user.username(), "");
    }

    #[test]
    fn hydrate_numeric_username_is_coerced() {
        let user = User::hydrate(&raw(json!({"username": 1234})), 0, &User::metadata()).unwrap();
        assert_eq!(user.username(), "1234");
    }

    #[test]
    fn hydrate_strict_rejects_missing_username() {
        let meta = User::metadata().strict(true);
        let err = User::hydrate(&raw(json!({})), 2, &meta).unwrap_err();
        assert_eq!(
            err,
            HydrateError::MissingField {
                field: "username".to_string(),
                row: 2,
            }
        );
    }

    #[test]
    fn metadata_declares_username_identifier() {
        assert_eq!(User::metadata().identifier, vec!["username".to_string()]);
    }

    #[test]
    fn identity_follows_metadata() {
        let user = User::new("ccovey");
        assert_eq!(user.identity(&User::metadata()), vec!["ccovey".to_string()]);
    }

    #[test]
    fn field_unknown_is_none() {
        assert_eq!(User::new("a").field("email"), None);
    }

    #[test]
    fn serializes_username() {
        let text = serde_json::to_string(&User::new("jwage")).unwrap();
        assert_eq!(text, r#"{"username":"jwage"}"#);
    }
}
