// Request context handed to resource handlers

use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use hyper::Method;
use serde::de::DeserializeOwned;

use crate::error::ResourceError;

/// Read-only view of an inbound request
///
/// Built by the transport adapter with the body already buffered;
/// the dispatcher never mutates it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RequestContext {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Attach a header, ignoring values that are not valid header text
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Header value as text, `None` when absent or not visible ASCII
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn accept(&self) -> Option<&str> {
        self.headers.get(ACCEPT).and_then(|v| v.to_str().ok())
    }

    /// Decode the body as JSON
    ///
    /// Fails with 400 Bad Request so handlers can propagate it with `?`.
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, ResourceError> {
        serde_json::from_slice(&self.body)
            .map_err(|e| ResourceError::bad_request(format!("Invalid JSON: {e}")))
    }
}
