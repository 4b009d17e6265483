//! REST dispatcher
//!
//! [`ApiBuilder`] collects resources and serializers, [`Api`] is the frozen
//! result that answers requests. Registration happens strictly before
//! serving: an `Api` has no way to add routes.
//!
//! ```
//! use restitude::resource::{GetCollection, HandlerResult, Resource};
//! use restitude::{ApiBuilder, RequestContext};
//! use hyper::{Method, StatusCode};
//!
//! struct WidgetResource;
//!
//! impl GetCollection for WidgetResource {
//!     fn get_collection(&self, _ctx: &RequestContext) -> HandlerResult {
//!         Ok(serde_json::json!(["gear"]))
//!     }
//! }
//!
//! impl Resource for WidgetResource {
//!     fn as_get_collection(&self) -> Option<&dyn GetCollection> {
//!         Some(self)
//!     }
//! }
//!
//! let api = ApiBuilder::new("/api/").register(WidgetResource).build();
//! let response = api.dispatch(&RequestContext::new(Method::GET, "/api/widget"));
//! assert_eq!(response.status, StatusCode::OK);
//! assert_eq!(&response.body[..], br#"["gear"]"#);
//! ```

mod context;
pub mod envelope;
pub mod service;

pub use context::RequestContext;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use hyper::body::Bytes;
use hyper::StatusCode;
use serde_json::Value;

use crate::config::ApiConfig;
use crate::error::{ApiError, EncodeError};
use crate::http::negotiate::negotiate;
use crate::logger;
use crate::resource::{resolve_base_name, HandlerResult, Resource};
use crate::routing::{parse_target, IdentifierMode, RouteTable, Target};
use crate::serializer::{encode_json, Document, SerializerRegistry, JSON};

/// Encoded answer to one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

impl ApiResponse {
    fn new(status: StatusCode, content_type: &str, body: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            body: Bytes::from(body),
        }
    }

    /// Last resort when no serializer could produce a body
    fn plain(status: StatusCode, message: String) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8".to_string(),
            body: Bytes::from(message),
        }
    }
}

/// Registration phase of an API
pub struct ApiBuilder {
    prefix: String,
    routes: RouteTable,
    serializers: SerializerRegistry,
    identifier_mode: IdentifierMode,
    wrap_collections: bool,
}

impl ApiBuilder {
    /// API answering below `prefix`, with JSON and XML serializers
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        logger::log_api_created(&prefix);
        Self {
            prefix,
            routes: RouteTable::new(),
            serializers: SerializerRegistry::default(),
            identifier_mode: IdentifierMode::default(),
            wrap_collections: false,
        }
    }

    pub fn from_config(config: &ApiConfig) -> Self {
        Self::new(config.prefix.clone())
            .identifier_mode(config.identifier_mode)
            .wrap_collections(config.wrap_collections)
    }

    #[must_use]
    pub fn identifier_mode(mut self, mode: IdentifierMode) -> Self {
        self.identifier_mode = mode;
        self
    }

    /// Wrap collection results in a `CollectionResponse` envelope
    #[must_use]
    pub fn wrap_collections(mut self, wrap: bool) -> Self {
        self.wrap_collections = wrap;
        self
    }

    /// Add or replace the serializer for a content type
    #[must_use]
    pub fn serializer<F>(mut self, content_type: &str, encode: F) -> Self
    where
        F: Fn(&Document) -> Result<Vec<u8>, EncodeError> + Send + Sync + 'static,
    {
        self.serializers.insert(content_type, encode);
        self
    }

    /// Register every capability `resource` exposes under its base name
    ///
    /// A capability already bound for the same method, base name and shape
    /// is replaced (last registration wins) and a warning is logged.
    #[must_use]
    pub fn register<R: Resource>(self, resource: R) -> Self {
        self.register_shared(Arc::new(resource))
    }

    /// Like [`register`](Self::register) for a resource the caller keeps a handle to
    #[must_use]
    pub fn register_shared<R: Resource>(mut self, resource: Arc<R>) -> Self {
        let base_name = resolve_base_name(resource.as_ref());
        if base_name.is_empty() {
            logger::log_warning(&format!(
                "[API] Skipping {}: empty base name",
                std::any::type_name::<R>()
            ));
            return self;
        }

        let bindings = self.routes.bind_resource(&base_name, &resource);
        logger::log_resource_registered(&base_name, &bindings);
        self
    }

    pub fn build(self) -> Api {
        Api {
            prefix: self.prefix,
            routes: self.routes,
            serializers: self.serializers,
            identifier_mode: self.identifier_mode,
            wrap_collections: self.wrap_collections,
        }
    }
}

/// Immutable, shareable dispatcher
pub struct Api {
    prefix: String,
    routes: RouteTable,
    serializers: SerializerRegistry,
    identifier_mode: IdentifierMode,
    wrap_collections: bool,
}

impl Api {
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Base names with at least one bound capability
    pub fn resources(&self) -> Vec<&str> {
        self.routes.resources()
    }

    pub fn content_types(&self) -> Vec<&str> {
        self.serializers.content_types()
    }

    /// Route, invoke and encode one request
    ///
    /// Never fails: routing misses, handler errors and encoding failures
    /// all come back as an error envelope with a matching status.
    pub fn dispatch(&self, ctx: &RequestContext) -> ApiResponse {
        logger::log_dispatch(&ctx.method, &ctx.path);

        let (status, document) = match self.route(ctx) {
            Ok(document) => (StatusCode::OK, document),
            Err(err) => {
                logger::log_debug(&format!("[API] {} {}: {err}", ctx.method, ctx.path));
                (err.status(), envelope::error(&err))
            }
        };

        self.encode(ctx.accept(), status, &document)
    }

    fn route(&self, ctx: &RequestContext) -> Result<Document, ApiError> {
        let target = parse_target(&self.prefix, &ctx.path, self.identifier_mode)
            .ok_or(ApiError::NoResource)?;

        match target {
            Target::Schema => Err(ApiError::SchemaNotImplemented),
            Target::Collection { resource } => {
                let handler = self
                    .routes
                    .collection(&ctx.method, resource)
                    .ok_or(ApiError::NoResource)?;
                let value = guarded(ctx, || handler(ctx))?;
                Ok(if self.wrap_collections {
                    envelope::collection(value)
                } else {
                    envelope::result(value)
                })
            }
            Target::Item {
                resource,
                identifier,
            } => {
                let handler = self
                    .routes
                    .item(&ctx.method, resource)
                    .ok_or(ApiError::NoResource)?;
                Ok(envelope::result(guarded(ctx, || handler(identifier, ctx))?))
            }
        }
    }

    fn encode(&self, accept: Option<&str>, status: StatusCode, document: &Document) -> ApiResponse {
        let Some(negotiated) = negotiate(accept, &self.serializers) else {
            return encoding_failure(EncodeError::new(JSON, "no serializer registered"));
        };

        match (negotiated.encode)(document) {
            Ok(body) => ApiResponse::new(status, negotiated.content_type, body),
            Err(err) => {
                logger::log_encode_error(&err);
                encoding_failure(err)
            }
        }
    }
}

/// Run a handler, turning a panic into a 500
fn guarded(ctx: &RequestContext, call: impl FnOnce() -> HandlerResult) -> Result<Value, ApiError> {
    match panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(result) => result.map_err(ApiError::from),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "non-string panic payload".to_string());
            logger::log_error(&format!(
                "[API] Handler for {} {} panicked: {reason}",
                ctx.method, ctx.path
            ));
            Err(ApiError::HandlerPanicked)
        }
    }
}

/// 500 envelope encoded with the built-in JSON encoder
fn encoding_failure(err: EncodeError) -> ApiResponse {
    let err = ApiError::Encoding(err);
    match encode_json(&envelope::error(&err)) {
        Ok(body) => ApiResponse::new(err.status(), JSON, body),
        Err(_) => ApiResponse::plain(err.status(), err.to_string()),
    }
}
