//! HTTP protocol layer module
//!
//! Content negotiation and response building, decoupled from the
//! dispatcher's routing logic.

pub mod negotiate;
pub mod response;

pub use negotiate::{accepted_types, negotiate, Negotiated};
pub use response::{build_400_response, build_413_response, build_api_response};
