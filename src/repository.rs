//! Read-only object repositories.
//!
//! An [`ObjectRepository`] takes a snapshot of its [`DataSource`] at
//! construction: every row is hydrated once, in source order, and an index
//! from identifier values to position is built alongside. Nothing mutates the
//! collection afterwards, so a repository can be shared by reference freely.
//!
//! Identifiers are assumed unique but not enforced. When two rows share an
//! identifier, keyed lookups return the first one and a warning is logged.
//!
//! [`UserRepository`] is the user-facing facade with the typed
//! [`find_one_by_username`](UserRepository::find_one_by_username) lookup.

use crate::metadata::{EntityMetadata, HydrateError};
use crate::model::{Hydrate, User};
use crate::source::{DataSource, DataSourceError};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Data source error: {0}")]
    Source(#[from] DataSourceError),
    #[error("Hydration error: {0}")]
    Hydrate(#[from] HydrateError),
    #[error("No object with {field} = '{value}'")]
    NotFound { field: String, value: String },
}

/// Field/value pairs that must all match for an object to be selected.
pub type Criteria<'a> = [(&'a str, &'a str)];

pub struct ObjectRepository<T> {
    metadata: EntityMetadata,
    objects: Vec<T>,
    index: HashMap<Vec<String>, usize>,
}

impl<T: Hydrate> ObjectRepository<T> {
    /// Hydrate every row of `source` using `metadata`.
    pub fn new(source: impl DataSource, metadata: EntityMetadata) -> Result<Self, RepositoryError> {
        let rows = source.source_rows()?;
        let objects = rows
            .iter()
            .enumerate()
            .map(|(row, raw)| T::hydrate(raw, row, &metadata))
            .collect::<Result<Vec<_>, _>>()?;

        let mut index: HashMap<Vec<String>, usize> = HashMap::with_capacity(objects.len());
        for (pos, object) in objects.iter().enumerate() {
            let id = object.identity(&metadata);
            if let Some(first) = index.get(&id) {
                tracing::warn!(
                    identifier = ?id,
                    first_row = *first,
                    duplicate_row = pos,
                    "duplicate identifier, keyed lookups return the first row"
                );
            } else {
                index.insert(id, pos);
            }
        }

        tracing::debug!(objects = objects.len(), "repository hydrated");
        Ok(Self {
            metadata,
            objects,
            index,
        })
    }

    /// Build with the model's default metadata.
    pub fn with_defaults(source: impl DataSource) -> Result<Self, RepositoryError> {
        Self::new(source, T::metadata())
    }

    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    /// Every object, in source order.
    pub fn find_all(&self) -> &[T] {
        &self.objects
    }

    /// Indexed lookup by identifier values, in metadata order.
    pub fn find(&self, id: &[&str]) -> Option<&T> {
        let key: Vec<String> = id.iter().map(|s| s.to_string()).collect();
        self.index.get(&key).map(|&pos| &self.objects[pos])
    }

    /// Every object matching all `criteria`, in source order.
    pub fn find_by(&self, criteria: &Criteria<'_>) -> Vec<&T> {
        self.objects
            .iter()
            .filter(|o| matches(*o, criteria))
            .collect()
    }

    /// First object matching all `criteria`.
    ///
    /// A criteria set that covers exactly the identifier fields goes through
    /// the index.
    pub fn find_one_by(&self, criteria: &Criteria<'_>) -> Option<&T> {
        if let Some(id) = self.identifier_key(criteria) {
            return self.find(&id);
        }
        self.objects.iter().find(|o| matches(*o, criteria))
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn identifier_key<'a>(&self, criteria: &Criteria<'a>) -> Option<Vec<&'a str>> {
        if criteria.len() != self.metadata.identifier.len() {
            return None;
        }
        self.metadata
            .identifier
            .iter()
            .map(|field| {
                criteria
                    .iter()
                    .find(|(name, _)| name == field)
                    .map(|&(_, value)| value)
            })
            .collect()
    }
}

fn matches<T: Hydrate>(object: &T, criteria: &Criteria<'_>) -> bool {
    criteria
        .iter()
        .all(|(field, value)| object.field(field) == Some(*value))
}

/// Repository of [`User`]s.
pub struct UserRepository {
    inner: ObjectRepository<User>,
}

impl UserRepository {
    pub fn new(source: impl DataSource, metadata: EntityMetadata) -> Result<Self, RepositoryError> {
        Ok(Self {
            inner: ObjectRepository::new(source, metadata)?,
        })
    }

    pub fn with_defaults(source: impl DataSource) -> Result<Self, RepositoryError> {
        Self::new(source, User::metadata())
    }

    pub fn find_all(&self) -> &[User] {
        self.inner.find_all()
    }

    /// Exact-match lookup on the username.
    ///
    /// Fails with [`RepositoryError::NotFound`] rather than returning an empty
    /// user, so a missing row can't be mistaken for a row with an empty name.
    pub fn find_one_by_username(&self, username: &str) -> Result<&User, RepositoryError> {
        self.inner
            .find_one_by(&[("username", username)])
            .ok_or_else(|| RepositoryError::NotFound {
                field: "username".to_string(),
                value: username.to_string(),
            })
    }

    pub fn objects(&self) -> &ObjectRepository<User> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{StaticUsers, VecSource};
    use crate::test_helpers::rows;
    use serde_json::json;

    fn users() -> UserRepository {
        UserRepository::with_defaults(StaticUsers).unwrap()
    }

    fn names(users: &[User]) -> Vec<&str> {
        users.iter().map(User::username).collect()
    }

    #[test]
    fn find_all_in_source_order() {
        let repo = users();
        assert_eq!(names(repo.find_all()), vec!["jwage", "ocramius", "ccovey"]);
    }

    #[test]
    fn find_all_is_idempotent() {
        let repo = users();
        assert_eq!(repo.find_all(), repo.find_all());
    }

    #[test]
    fn find_one_by_username_found() {
        let repo = users();
        assert_eq!(repo.find_one_by_username("ccovey").unwrap().username(), "ccovey");
    }

    #[test]
    fn every_present_username_is_found() {
        let repo = users();
        for user in repo.find_all() {
            let found = repo.find_one_by_username(user.username()).unwrap();
            assert_eq!(found.username(), user.username());
        }
    }

    #[test]
    fn find_one_by_username_not_found() {
        let repo = users();
        let err = repo.find_one_by_username("nope").unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::NotFound { ref field, ref value } if field == "username" && value == "nope"
        ));
    }

    #[test]
    fn lookup_is_exact_match() {
        let repo = users();
        assert!(repo.find_one_by_username("JWAGE").is_err());
        assert!(repo.find_one_by_username("jwag").is_err());
    }

    #[test]
    fn missing_username_hydrates_to_empty() {
        let source = VecSource(rows(json!([{"username": "a"}, {"email": "b@example.com"}])));
        let repo = UserRepository::with_defaults(source).unwrap();
        assert_eq!(names(repo.find_all()), vec!["a", ""]);
        // Found-but-empty is distinct from not found.
        assert_eq!(repo.find_one_by_username("").unwrap().username(), "");
    }

    #[test]
    fn empty_username_not_found_when_absent() {
        let repo = users();
        assert!(matches!(
            repo.find_one_by_username(""),
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn strict_metadata_rejects_missing_username() {
        let source = VecSource(rows(json!([{"username": "a"}, {}])));
        let result = UserRepository::new(source, User::metadata().strict(true));
        assert!(matches!(
            result,
            Err(RepositoryError::Hydrate(HydrateError::MissingField { row: 1, .. }))
        ));
    }

    #[test]
    fn duplicate_identifier_returns_first() {
        let source = VecSource(rows(json!([{"username": "dup"}, {"username": "dup"}])));
        let repo = ObjectRepository::<User>::with_defaults(source).unwrap();
        assert_eq!(repo.len(), 2);
        let first = repo.find(&["dup"]).unwrap();
        assert!(std::ptr::eq(first, &repo.find_all()[0]));
    }

    #[test]
    fn find_by_returns_all_matches_in_order() {
        let source = VecSource(rows(json!([
            {"username": "x"},
            {"username": "y"},
            {"username": "x"}
        ])));
        let repo = ObjectRepository::<User>::with_defaults(source).unwrap();
        assert_eq!(repo.find_by(&[("username", "x")]).len(), 2);
        assert!(repo.find_by(&[("username", "z")]).is_empty());
    }

    #[test]
    fn find_by_unknown_field_matches_nothing() {
        let repo = ObjectRepository::<User>::with_defaults(StaticUsers).unwrap();
        assert!(repo.find_by(&[("email", "jwage")]).is_empty());
        assert!(repo.find_one_by(&[("email", "jwage")]).is_none());
    }

    #[test]
    fn find_by_empty_criteria_matches_everything() {
        let repo = ObjectRepository::<User>::with_defaults(StaticUsers).unwrap();
        assert_eq!(repo.find_by(&[]).len(), 3);
    }

    #[test]
    fn source_error_propagates() {
        let source = crate::source::FileSource::new("missing.json");
        assert!(matches!(
            UserRepository::with_defaults(source),
            Err(RepositoryError::Source(_))
        ));
    }

    #[test]
    fn user_repository_exposes_criteria_lookups() {
        let repo = users();
        assert_eq!(repo.objects().find_by(&[("username", "ocramius")]).len(), 1);
        assert_eq!(repo.objects().metadata().identifier, vec!["username".to_string()]);
    }

    #[test]
    fn empty_source_is_empty_repository() {
        let repo = ObjectRepository::<User>::with_defaults(VecSource::default()).unwrap();
        assert!(repo.is_empty());
        assert!(repo.find(&["jwage"]).is_none());
    }

    mod properties {
        use super::*;
        use crate::test_helpers::{username_column, username_rows};
        use proptest::prelude::*;

        proptest! {
            /// find_all mirrors the source rows one for one.
            #[test]
            fn find_all_mirrors_rows(names in username_column()) {
                let repo = UserRepository::with_defaults(VecSource(username_rows(&names))).unwrap();
                let users = repo.find_all();
                prop_assert_eq!(users.len(), names.len());
                for (user, name) in users.iter().zip(&names) {
                    prop_assert_eq!(user.username(), name.as_deref().unwrap_or(""));
                }
                prop_assert_eq!(repo.find_all(), users);
            }

            /// Every username present in the source can be looked up.
            #[test]
            fn present_usernames_are_found(names in username_column()) {
                let repo = UserRepository::with_defaults(VecSource(username_rows(&names))).unwrap();
                for user in repo.find_all() {
                    let found = repo.find_one_by_username(user.username()).unwrap();
                    prop_assert_eq!(found.username(), user.username());
                }
            }

            /// A name outside the generated alphabet is always NotFound.
            #[test]
            fn absent_username_is_not_found(names in username_column(), absent in "[x-z]{1,3}") {
                let repo = UserRepository::with_defaults(VecSource(username_rows(&names))).unwrap();
                let is_not_found = matches!(
                    repo.find_one_by_username(&absent),
                    Err(RepositoryError::NotFound { .. })
                );
                prop_assert!(is_not_found);
            }
        }
    }
}
