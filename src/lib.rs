//! restitude: a small REST dispatcher.
//!
//! Resources advertise what they can do by implementing per-verb
//! capability traits; [`ApiBuilder`] turns them into a route table keyed by
//! method, base name and shape (item or collection). Results are encoded
//! according to the request's `Accept` header.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod logger;
pub mod resource;
pub mod routing;
pub mod serializer;
pub mod server;
pub mod widgets;

pub use api::{Api, ApiBuilder, ApiResponse, RequestContext};
pub use error::{ApiError, EncodeError, ResourceError};
