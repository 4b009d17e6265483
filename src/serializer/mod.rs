//! Serializer registry
//!
//! Maps a content type to the function that encodes response documents
//! for it. The registry is filled before the API is built and only read
//! afterwards.

mod xml;

pub use xml::encode_xml;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::EncodeError;

pub const JSON: &str = "application/json";
pub const XML: &str = "application/xml";

/// A response body before encoding
///
/// `root` names the document for formats that need a root element (XML);
/// JSON only encodes `value`.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: &'static str,
    pub value: Value,
}

impl Document {
    pub const fn new(root: &'static str, value: Value) -> Self {
        Self { root, value }
    }
}

/// Encode function for one content type
pub type EncodeFn = Arc<dyn Fn(&Document) -> Result<Vec<u8>, EncodeError> + Send + Sync>;

/// Content type → encoder
#[derive(Clone)]
pub struct SerializerRegistry {
    encoders: HashMap<String, EncodeFn>,
}

impl SerializerRegistry {
    /// Registry without any encoder
    pub fn empty() -> Self {
        Self {
            encoders: HashMap::new(),
        }
    }

    /// Add or replace the encoder for `content_type`
    pub fn insert<F>(&mut self, content_type: &str, encode: F)
    where
        F: Fn(&Document) -> Result<Vec<u8>, EncodeError> + Send + Sync + 'static,
    {
        self.encoders
            .insert(content_type.to_ascii_lowercase(), Arc::new(encode));
    }

    /// Encoder registered for `content_type`, compared case-insensitively
    pub fn get(&self, content_type: &str) -> Option<&EncodeFn> {
        self.encoders.get(&content_type.to_ascii_lowercase())
    }

    /// Like [`get`](Self::get), also returning the registered key
    pub fn get_key_value(&self, content_type: &str) -> Option<(&str, &EncodeFn)> {
        self.encoders
            .get_key_value(&content_type.to_ascii_lowercase())
            .map(|(key, encode)| (key.as_str(), encode))
    }

    pub fn contains(&self, content_type: &str) -> bool {
        self.encoders.contains_key(&content_type.to_ascii_lowercase())
    }

    pub fn content_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.encoders.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl Default for SerializerRegistry {
    /// JSON and XML encoders
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.insert(JSON, encode_json);
        registry.insert(XML, xml::encode_xml);
        registry
    }
}

impl fmt::Debug for SerializerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializerRegistry")
            .field("content_types", &self.content_types())
            .finish()
    }
}

/// Compact JSON of the document value
pub fn encode_json(doc: &Document) -> Result<Vec<u8>, EncodeError> {
    serde_json::to_vec(&doc.value).map_err(|e| EncodeError::new(JSON, e))
}
