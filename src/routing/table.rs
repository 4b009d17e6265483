//! Route table
//!
//! Two independent mappings, one per request shape, each keyed by HTTP
//! method and then by resource base name.

use std::collections::HashMap;
use std::sync::Arc;

use hyper::Method;

use crate::api::RequestContext;
use crate::error::{ResourceError, MATCHING_RESOURCE_NOT_FOUND};
use crate::resource::{HandlerResult, Resource};

/// Bound item operation: `(identifier, ctx)`
pub type ItemHandler = Arc<dyn Fn(&str, &RequestContext) -> HandlerResult + Send + Sync>;

/// Bound collection operation: `(ctx)`
pub type CollectionHandler = Arc<dyn Fn(&RequestContext) -> HandlerResult + Send + Sync>;

/// Every method a capability can be bound to
pub const METHODS: [Method; 7] = [
    Method::DELETE,
    Method::GET,
    Method::HEAD,
    Method::OPTIONS,
    Method::PATCH,
    Method::POST,
    Method::PUT,
];

/// Request shape a handler is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Item,
    Collection,
}

impl Shape {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Item => "item",
            Self::Collection => "collection",
        }
    }
}

/// One capability bound during registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub method: Method,
    pub shape: Shape,
    /// True when an earlier handler for the same triple was replaced
    pub replaced: bool,
}

type HandlerStore<H> = HashMap<String, H>;

#[derive(Default, Clone)]
pub struct RouteTable {
    item: HashMap<Method, HandlerStore<ItemHandler>>,
    collection: HashMap<Method, HandlerStore<CollectionHandler>>,
}

impl RouteTable {
    pub fn new() -> Self {
        let mut table = Self::default();
        for method in METHODS {
            table.item.insert(method.clone(), HashMap::new());
            table.collection.insert(method, HashMap::new());
        }
        table
    }

    /// Bind an item handler, replacing any previous one for the same key
    ///
    /// Returns `true` when a handler was replaced.
    pub fn insert_item(&mut self, method: Method, base_name: &str, handler: ItemHandler) -> bool {
        self.item
            .entry(method)
            .or_default()
            .insert(base_name.to_string(), handler)
            .is_some()
    }

    /// Bind a collection handler, replacing any previous one for the same key
    pub fn insert_collection(
        &mut self,
        method: Method,
        base_name: &str,
        handler: CollectionHandler,
    ) -> bool {
        self.collection
            .entry(method)
            .or_default()
            .insert(base_name.to_string(), handler)
            .is_some()
    }

    pub fn item(&self, method: &Method, base_name: &str) -> Option<&ItemHandler> {
        self.item.get(method)?.get(base_name)
    }

    pub fn collection(&self, method: &Method, base_name: &str) -> Option<&CollectionHandler> {
        self.collection.get(method)?.get(base_name)
    }

    /// Sorted base names with at least one binding
    pub fn resources(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .item
            .values()
            .flat_map(HashMap::keys)
            .chain(self.collection.values().flat_map(HashMap::keys))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Probe every capability of `resource` and bind the ones it exposes
    pub fn bind_resource<R: Resource>(&mut self, base_name: &str, resource: &Arc<R>) -> Vec<Binding> {
        let mut bindings = Vec::new();

        macro_rules! bind_item {
            ($method:expr, $probe:ident, $call:ident) => {
                if resource.$probe().is_some() {
                    let target = Arc::clone(resource);
                    let handler: ItemHandler = Arc::new(move |identifier: &str, ctx: &RequestContext| {
                        target
                            .$probe()
                            .map_or_else(unbound, |cap| cap.$call(identifier, ctx))
                    });
                    let replaced = self.insert_item($method, base_name, handler);
                    bindings.push(Binding {
                        method: $method,
                        shape: Shape::Item,
                        replaced,
                    });
                }
            };
        }

        macro_rules! bind_collection {
            ($method:expr, $probe:ident, $call:ident) => {
                if resource.$probe().is_some() {
                    let target = Arc::clone(resource);
                    let handler: CollectionHandler = Arc::new(move |ctx: &RequestContext| {
                        target.$probe().map_or_else(unbound, |cap| cap.$call(ctx))
                    });
                    let replaced = self.insert_collection($method, base_name, handler);
                    bindings.push(Binding {
                        method: $method,
                        shape: Shape::Collection,
                        replaced,
                    });
                }
            };
        }

        bind_item!(Method::DELETE, as_delete_item, delete_item);
        bind_item!(Method::GET, as_get_item, get_item);
        bind_item!(Method::HEAD, as_head_item, head_item);
        bind_item!(Method::OPTIONS, as_options_item, options_item);
        bind_item!(Method::PATCH, as_patch_item, patch_item);
        bind_item!(Method::POST, as_post_item, post_item);
        bind_item!(Method::PUT, as_put_item, put_item);

        bind_collection!(Method::DELETE, as_delete_collection, delete_collection);
        bind_collection!(Method::GET, as_get_collection, get_collection);
        bind_collection!(Method::HEAD, as_head_collection, head_collection);
        bind_collection!(Method::OPTIONS, as_options_collection, options_collection);
        bind_collection!(Method::PATCH, as_patch_collection, patch_collection);
        bind_collection!(Method::POST, as_post_collection, post_collection);
        bind_collection!(Method::PUT, as_put_collection, put_collection);

        bindings
    }
}

/// A resource stopped exposing a capability it had at registration
fn unbound() -> HandlerResult {
    Err(ResourceError::not_found(MATCHING_RESOURCE_NOT_FOUND))
}
