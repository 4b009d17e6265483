//! Request path parsing
//!
//! Splits a request path below the API prefix into a resource name and,
//! for item requests, an identifier.

use serde::{Deserialize, Serialize};

/// How the identifier of an item request is taken from the path
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierMode {
    /// Everything after the resource name, slashes included
    #[default]
    Remainder,
    /// Only the segment after the resource name
    Segment,
}

/// What a request path addresses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<'a> {
    /// The API root itself
    Schema,
    Collection {
        resource: &'a str,
    },
    Item {
        resource: &'a str,
        identifier: &'a str,
    },
}

/// Parse `path` relative to `prefix`
///
/// Returns `None` for paths outside the prefix. Leading and trailing
/// slashes of the remainder are ignored, so `/api/widgets/42/` and
/// `/api/widgets/42` address the same item.
///
/// ```
/// use restitude::routing::{parse_target, IdentifierMode, Target};
/// assert_eq!(
///     parse_target("/api/", "/api/widgets/42", IdentifierMode::Remainder),
///     Some(Target::Item { resource: "widgets", identifier: "42" }),
/// );
/// ```
pub fn parse_target<'a>(prefix: &str, path: &'a str, mode: IdentifierMode) -> Option<Target<'a>> {
    let rest = match path.strip_prefix(prefix) {
        Some(rest) if prefix.ends_with('/') || rest.is_empty() || rest.starts_with('/') => rest,
        // "/api" for prefix "/api/"
        None if path == prefix.trim_end_matches('/') => "",
        _ => return None,
    };

    let rest = rest.trim_matches('/');
    if rest.is_empty() {
        return Some(Target::Schema);
    }

    let target = match rest.split_once('/') {
        None => Target::Collection { resource: rest },
        Some((resource, remainder)) => {
            let identifier = match mode {
                IdentifierMode::Remainder => remainder,
                IdentifierMode::Segment => remainder.split('/').next().unwrap_or(remainder),
            };
            Target::Item {
                resource,
                identifier,
            }
        }
    };
    Some(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "/api/";

    fn parse(path: &str) -> Option<Target<'_>> {
        parse_target(PREFIX, path, IdentifierMode::Remainder)
    }

    #[test]
    fn test_collection() {
        assert_eq!(
            parse("/api/widgets"),
            Some(Target::Collection {
                resource: "widgets"
            })
        );
        assert_eq!(
            parse("/api/widgets/"),
            Some(Target::Collection {
                resource: "widgets"
            })
        );
    }

    #[test]
    fn test_item() {
        let expected = Some(Target::Item {
            resource: "widgets",
            identifier: "42",
        });
        assert_eq!(parse("/api/widgets/42"), expected);
        assert_eq!(parse("/api/widgets/42/"), expected);
        assert_eq!(parse("/api/widgets/42///"), expected);
    }

    #[test]
    fn test_schema() {
        assert_eq!(parse("/api/"), Some(Target::Schema));
        assert_eq!(parse("/api"), Some(Target::Schema));
        assert_eq!(parse("/api//"), Some(Target::Schema));
    }

    #[test]
    fn test_outside_prefix() {
        assert_eq!(parse("/other/widgets"), None);
        assert_eq!(parse("/apiary"), None);
    }

    #[test]
    fn test_identifier_modes() {
        assert_eq!(
            parse_target(PREFIX, "/api/files/docs/readme.md", IdentifierMode::Remainder),
            Some(Target::Item {
                resource: "files",
                identifier: "docs/readme.md"
            })
        );
        assert_eq!(
            parse_target(PREFIX, "/api/files/docs/readme.md", IdentifierMode::Segment),
            Some(Target::Item {
                resource: "files",
                identifier: "docs"
            })
        );
    }

    #[test]
    fn test_prefix_without_trailing_slash() {
        assert_eq!(
            parse_target("/v1", "/v1/widgets/7", IdentifierMode::Remainder),
            Some(Target::Item {
                resource: "widgets",
                identifier: "7"
            })
        );
        assert_eq!(parse_target("/v1", "/v1widgets", IdentifierMode::Remainder), None);
        assert_eq!(
            parse_target("/", "/widgets", IdentifierMode::Remainder),
            Some(Target::Collection {
                resource: "widgets"
            })
        );
    }
}
