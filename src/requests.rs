//! Request providers: which pages get generated.
//!
//! A provider turns repository contents into a [`RequestCollection`], one
//! [`RenderRequest`] per detail page. The generator feeds each request's
//! variables back into the matching controller action.

use crate::repository::UserRepository;
use crate::types::{RenderRequest, RequestCollection};

pub struct UserRequests<'a> {
    repository: &'a UserRepository,
}

impl<'a> UserRequests<'a> {
    pub fn new(repository: &'a UserRepository) -> Self {
        Self { repository }
    }

    /// One `{"username": ...}` request per user, in repository order.
    pub fn get_users(&self) -> RequestCollection {
        RequestCollection::new(
            self.repository
                .find_all()
                .iter()
                .map(|user| RenderRequest::new().with("username", user.username()))
                .collect(),
        )
    }
}
