//! Resource capability contracts
//!
//! A resource is any type implementing [`Resource`]. It opts into individual
//! operations by implementing the narrow capability traits below and exposing
//! them through the matching `as_*` accessor. Registration probes every
//! accessor and binds each capability it finds.
//!
//! ```
//! use restitude::resource::{GetCollection, Resource, HandlerResult};
//! use restitude::RequestContext;
//!
//! struct WidgetResource;
//!
//! impl GetCollection for WidgetResource {
//!     fn get_collection(&self, _ctx: &RequestContext) -> HandlerResult {
//!         Ok(serde_json::json!(["gear", "sprocket"]))
//!     }
//! }
//!
//! impl Resource for WidgetResource {
//!     fn as_get_collection(&self) -> Option<&dyn GetCollection> {
//!         Some(self)
//!     }
//! }
//! ```

mod naming;

pub use naming::{default_base_name, resolve_base_name};

use crate::api::RequestContext;
use crate::error::ResourceError;

/// Value returned by every handler
pub type HandlerResult = Result<serde_json::Value, ResourceError>;

// Item capabilities: operate on one identified member of a resource

pub trait DeleteItem: Send + Sync {
    fn delete_item(&self, identifier: &str, ctx: &RequestContext) -> HandlerResult;
}

pub trait GetItem: Send + Sync {
    fn get_item(&self, identifier: &str, ctx: &RequestContext) -> HandlerResult;
}

pub trait HeadItem: Send + Sync {
    fn head_item(&self, identifier: &str, ctx: &RequestContext) -> HandlerResult;
}

pub trait OptionsItem: Send + Sync {
    fn options_item(&self, identifier: &str, ctx: &RequestContext) -> HandlerResult;
}

pub trait PatchItem: Send + Sync {
    fn patch_item(&self, identifier: &str, ctx: &RequestContext) -> HandlerResult;
}

pub trait PostItem: Send + Sync {
    fn post_item(&self, identifier: &str, ctx: &RequestContext) -> HandlerResult;
}

pub trait PutItem: Send + Sync {
    fn put_item(&self, identifier: &str, ctx: &RequestContext) -> HandlerResult;
}

// Collection capabilities: operate on the resource as a whole

pub trait DeleteCollection: Send + Sync {
    fn delete_collection(&self, ctx: &RequestContext) -> HandlerResult;
}

pub trait GetCollection: Send + Sync {
    fn get_collection(&self, ctx: &RequestContext) -> HandlerResult;
}

pub trait HeadCollection: Send + Sync {
    fn head_collection(&self, ctx: &RequestContext) -> HandlerResult;
}

pub trait OptionsCollection: Send + Sync {
    fn options_collection(&self, ctx: &RequestContext) -> HandlerResult;
}

pub trait PatchCollection: Send + Sync {
    fn patch_collection(&self, ctx: &RequestContext) -> HandlerResult;
}

pub trait PostCollection: Send + Sync {
    fn post_collection(&self, ctx: &RequestContext) -> HandlerResult;
}

pub trait PutCollection: Send + Sync {
    fn put_collection(&self, ctx: &RequestContext) -> HandlerResult;
}

/// A family of endpoints backed by one handler object
///
/// Every accessor defaults to `None`; override the ones the type implements
/// with `Some(self)`.
pub trait Resource: Send + Sync + 'static {
    /// Explicit base name, used verbatim when present
    ///
    /// When `None` the name is derived from the type name, see
    /// [`default_base_name`].
    fn base_name(&self) -> Option<String> {
        None
    }

    fn as_delete_item(&self) -> Option<&dyn DeleteItem> {
        None
    }

    fn as_get_item(&self) -> Option<&dyn GetItem> {
        None
    }

    fn as_head_item(&self) -> Option<&dyn HeadItem> {
        None
    }

    fn as_options_item(&self) -> Option<&dyn OptionsItem> {
        None
    }

    fn as_patch_item(&self) -> Option<&dyn PatchItem> {
        None
    }

    fn as_post_item(&self) -> Option<&dyn PostItem> {
        None
    }

    fn as_put_item(&self) -> Option<&dyn PutItem> {
        None
    }

    fn as_delete_collection(&self) -> Option<&dyn DeleteCollection> {
        None
    }

    fn as_get_collection(&self) -> Option<&dyn GetCollection> {
        None
    }

    fn as_head_collection(&self) -> Option<&dyn HeadCollection> {
        None
    }

    fn as_options_collection(&self) -> Option<&dyn OptionsCollection> {
        None
    }

    fn as_patch_collection(&self) -> Option<&dyn PatchCollection> {
        None
    }

    fn as_post_collection(&self) -> Option<&dyn PostCollection> {
        None
    }

    fn as_put_collection(&self) -> Option<&dyn PutCollection> {
        None
    }
}
