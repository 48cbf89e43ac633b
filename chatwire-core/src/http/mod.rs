//! HTTP request descriptors produced by the encoders
//!
//! Nothing in this module performs I/O. A [`ProviderRequest`] is the complete
//! description of a request that a transport layer could send:
//! - Method and absolute URL
//! - Ordered headers with case-insensitive lookups
//! - A JSON body in the provider's wire shape

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP method of a provider request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Post => "POST",
        }
    }
}

/// Ordered header map
///
/// Names are stored lowercased, so keys stay unique regardless of the casing
/// callers use and lookups are case-insensitive. Insertion order is kept.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers(IndexMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a header; a replaced header keeps its position
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0.insert(name.as_ref().to_ascii_lowercase(), value.into())
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name.to_ascii_lowercase().as_str())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// A not-yet-sent HTTP request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Value,
}

impl ProviderRequest {
    /// Create a JSON POST request
    pub fn post(url: impl Into<String>, headers: Headers, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers,
            body,
        }
    }
}

/// Join an API base URL and an endpoint path with exactly one slash
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
