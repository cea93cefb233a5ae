//! Shared types passed between pipeline stages.
//!
//! Records flow source → repository (as [`RawRecord`]) and
//! repository → renderer (as [`RenderRequest`]). Both are plain JSON maps so a
//! row can come from any backing store and a request can carry any template
//! variable without a schema change.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single unprocessed row: field name → scalar value, in source order.
pub type RawRecord = Map<String, Value>;

/// Template variables for one rendered page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RenderRequest(Map<String, Value>);

impl RenderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, so requests read as a literal at the call site.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String-typed lookup. `None` if the key is absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Ordered set of requests produced by a request provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestCollection(Vec<RenderRequest>);

impl RequestCollection {
    pub fn new(requests: Vec<RenderRequest>) -> Self {
        Self(requests)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderRequest> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[RenderRequest] {
        &self.0
    }
}

impl IntoIterator for RequestCollection {
    type Item = RenderRequest;
    type IntoIter = std::vec::IntoIter<RenderRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a RequestCollection {
    type Item = &'a RenderRequest;
    type IntoIter = std::slice::Iter<'a, RenderRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_with_builds_map() {
        let req = RenderRequest::new().with("username", "jwage");
        assert_eq!(req.get_str("username"), Some("jwage"));
        assert_eq!(req.len(), 1);
    }

    #[test]
    fn request_get_str_rejects_non_strings() {
        let req = RenderRequest::new().with("count", 3);
        assert_eq!(req.get_str("count"), None);
        assert_eq!(req.get("count"), Some(&json!(3)));
    }

    #[test]
    fn request_serializes_as_plain_object() {
        let req = RenderRequest::new().with("username", "ccovey");
        let text = serde_json::to_string(&req).unwrap();
        assert_eq!(text, r#"{"username":"ccovey"}"#);
    }

    #[test]
    fn collection_preserves_order() {
        let coll = RequestCollection::new(vec![
            RenderRequest::new().with("username", "b"),
            RenderRequest::new().with("username", "a"),
        ]);
        let names: Vec<&str> = coll.iter().filter_map(|r| r.get_str("username")).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
