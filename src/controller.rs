//! Controller actions producing render directives.
//!
//! A [`Response`] pairs template parameters with an optional template name.
//! `None` means "the route's default template"; the generator decides what
//! that is for each route.

use crate::repository::{RepositoryError, UserRepository};
use serde::Serialize;
use serde_json::{Map, Value};

/// Template name for the user detail page.
pub const USER_TEMPLATE: &str = "user";

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub parameters: Map<String, Value>,
    pub template: Option<String>,
}

impl Response {
    pub fn new(parameters: Map<String, Value>) -> Self {
        Self {
            parameters,
            template: None,
        }
    }

    pub fn with_template(parameters: Map<String, Value>, template: impl Into<String>) -> Self {
        Self {
            parameters,
            template: Some(template.into()),
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }
}

fn parameter(name: &str, value: impl Serialize) -> Map<String, Value> {
    let value = serde_json::to_value(value).expect("template parameters must serialize to JSON");
    let mut map = Map::new();
    map.insert(name.to_string(), value);
    map
}

pub struct UserController<'a> {
    repository: &'a UserRepository,
}

impl<'a> UserController<'a> {
    pub fn new(repository: &'a UserRepository) -> Self {
        Self { repository }
    }

    /// Listing page: every user, default template.
    pub fn index(&self) -> Response {
        Response::new(parameter("users", self.repository.find_all()))
    }

    /// Detail page for one user.
    pub fn user(&self, username: &str) -> Result<Response, RepositoryError> {
        let user = self.repository.find_one_by_username(username)?;
        Ok(Response::with_template(
            parameter("user", user),
            USER_TEMPLATE,
        ))
    }
}
