use axum::body::Bytes;
use axum::http::{HeaderMap, Method};
use serde_json::Value;
use url::Url;

/// Normalized request body.
///
/// The adapter decides the variant once; handlers never re-guess. A body that
/// fails to decode as JSON stays available as `Raw` so the handler can decide
/// whether that is acceptable.
#[derive(Debug, Clone)]
pub enum Body {
    Absent,
    Raw(Bytes),
    Decoded(Value),
}

impl Body {
    pub fn is_absent(&self) -> bool {
        matches!(self, Body::Absent)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Body::Decoded(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&Bytes> {
        match self {
            Body::Raw(bytes) => Some(bytes),
            _ => None,
        }
    }
}

/// Normalized request handed to handlers. Immutable once constructed;
/// lives for exactly one inbound call.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Body,
}

impl Request {
    pub fn new(method: Method, url: Url, headers: HeaderMap, body: Body) -> Self {
        Self { method, url, headers, body }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn origin(&self) -> Option<&str> {
        self.header("origin")
    }

    /// First query-string value for `name`.
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Decoded JSON body, when the adapter recognized one.
    pub fn json(&self) -> Option<&Value> {
        self.body.as_json()
    }
}
