//! # userpages
//!
//! A tiny static site generator: one listing page plus one page per user.
//!
//! # Architecture: Source → Repository → Requests → Pages
//!
//! ```text
//! DataSource        rows          (built-in list, .json or .toml file)
//!   → Repository    User objects  (hydrated once, keyed by username)
//!   → UserRequests  render requests, one per user
//!   → Controller    render directives (parameters + template)
//!   → generate      dist/index.html, dist/user/{slug}.html
//! ```
//!
//! Every stage past the data source is a pure transformation over an
//! immutable snapshot, so the pipeline is easy to test stage by stage.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`source`] | `DataSource` trait, built-in users, data-file reader |
//! | [`metadata`] | Mapping metadata (identifier fields, strictness) and field coercion |
//! | [`model`] | `Hydrate` trait and the `User` model |
//! | [`repository`] | Read-only hydrated collections with keyed and criteria lookups |
//! | [`requests`] | Render request provider for user pages |
//! | [`controller`] | Listing and detail render directives |
//! | [`generate`] | HTML rendering with Maud and page writing |
//! | [`naming`] | Filesystem-safe page slugs |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`site`] | Wires config, source, repository and generator together |
//! | [`output`] | CLI output formatting |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`types`] | Raw records and render requests shared between stages |
//!
//! # Design Decisions
//!
//! ## Explicit Metadata
//!
//! The identifier field is declared in an [`metadata::EntityMetadata`] value
//! passed to the repository constructor rather than discovered at runtime.
//! The same value carries the strict/lenient hydration switch.
//!
//! ## Lenient Hydration By Default
//!
//! A row without a `username` becomes a user with an empty username. This
//! keeps existing data files building; `[data] strict = true` turns the
//! missing field into an error instead.
//!
//! ## Typed Not-Found
//!
//! [`repository::UserRepository::find_one_by_username`] returns
//! [`repository::RepositoryError::NotFound`] for unknown usernames, so a
//! missing user can never pass for a user with an empty name.

pub mod config;
pub mod controller;
pub mod generate;
pub mod logging;
pub mod metadata;
pub mod model;
pub mod naming;
pub mod output;
pub mod repository;
pub mod requests;
pub mod site;
pub mod source;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
