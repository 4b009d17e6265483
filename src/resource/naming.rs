//! Base name policy
//!
//! The base name is the path segment a resource answers on.

use super::Resource;

const RESOURCE_SUFFIX: &str = "Resource";

/// Derive a base name from a type name
///
/// Module path and generic arguments are ignored, a trailing `Resource`
/// is dropped when something remains in front of it, and the result is
/// lowercased.
///
/// ```
/// use restitude::resource::default_base_name;
/// assert_eq!(default_base_name("WidgetResource"), "widget");
/// assert_eq!(default_base_name("shop::Widget"), "widget");
/// assert_eq!(default_base_name("Resource"), "resource");
/// ```
pub fn default_base_name(type_name: &str) -> String {
    let without_generics = type_name.split('<').next().unwrap_or(type_name);
    let short = without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics);

    let stem = match short.strip_suffix(RESOURCE_SUFFIX) {
        Some(stem) if !stem.is_empty() => stem,
        _ => short,
    };

    stem.to_lowercase()
}

/// Base name of a registered resource: explicit name first, type name otherwise
pub fn resolve_base_name<R: Resource>(resource: &R) -> String {
    resource
        .base_name()
        .unwrap_or_else(|| default_base_name(std::any::type_name::<R>()))
}
