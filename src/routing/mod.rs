//! Routing module
//!
//! Turns a request path into a resource target and finds the handler bound
//! to it:
//! - Path parsing relative to the API prefix
//! - Item and collection route tables keyed by method and base name

mod path;
mod table;

pub use path::{parse_target, IdentifierMode, Target};
pub use table::{Binding, CollectionHandler, ItemHandler, RouteTable, Shape, METHODS};
