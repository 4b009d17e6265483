//! Content negotiation
//!
//! Picks the response serializer from the `Accept` header. Candidates are
//! tried in header order and the first registered one wins; quality values
//! are not weighed.

use crate::serializer::{EncodeFn, SerializerRegistry, JSON};

/// Negotiated content type and its encoder
pub struct Negotiated<'a> {
    pub content_type: &'a str,
    pub encode: &'a EncodeFn,
}

/// Content types listed in an `Accept` header, parameters stripped
///
/// ```
/// use restitude::http::negotiate::accepted_types;
/// let types: Vec<_> = accepted_types("application/xml;q=0.9, text/html").collect();
/// assert_eq!(types, ["application/xml", "text/html"]);
/// ```
pub fn accepted_types(accept: &str) -> impl Iterator<Item = &str> {
    accept
        .split(',')
        .map(|token| token.split(';').next().unwrap_or(token).trim())
        .filter(|token| !token.is_empty())
}

/// First registered content type listed in `accept`
///
/// Falls back to JSON when the header is absent or lists nothing the
/// registry knows. Returns `None` only if JSON itself is not registered.
pub fn negotiate<'a>(
    accept: Option<&str>,
    registry: &'a SerializerRegistry,
) -> Option<Negotiated<'a>> {
    let matched = accept.and_then(|accept| {
        accepted_types(accept)
            .find_map(|candidate| registry.get_key_value(candidate))
    });

    let (content_type, encode) = matched.or_else(|| registry.get_key_value(JSON))?;
    Some(Negotiated {
        content_type,
        encode,
    })
}
