// Response envelopes
//
// Wire shapes of everything the dispatcher answers with. Field names are
// capitalised to stay compatible with existing clients.

use serde_json::{json, Value};

use crate::error::ApiError;
use crate::serializer::Document;

pub const RESPONSE_ROOT: &str = "Response";
pub const COLLECTION_ROOT: &str = "CollectionResponse";
pub const ERROR_ROOT: &str = "ErrorResponse";

/// Handler result as returned
pub const fn result(value: Value) -> Document {
    Document::new(RESPONSE_ROOT, value)
}

/// Collection result wrapped as `{"Objects": ...}`
pub fn collection(value: Value) -> Document {
    Document::new(COLLECTION_ROOT, json!({ "Objects": value }))
}

/// `{"Message": ..., "Status": ...}`
pub fn error(err: &ApiError) -> Document {
    Document::new(
        ERROR_ROOT,
        json!({
            "Message": err.to_string(),
            "Status": err.status().as_u16(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ResourceError;

    #[test]
    fn test_error_envelope() {
        let doc = error(&ApiError::NoResource);
        assert_eq!(doc.root, ERROR_ROOT);
        assert_eq!(
            doc.value,
            json!({
                "Message": "No resource found matching the given request.",
                "Status": 404
            })
        );
    }

    #[test]
    fn test_handler_error_envelope() {
        let doc = error(&ResourceError::bad_request("name is required").into());
        assert_eq!(doc.value["Message"], "name is required");
        assert_eq!(doc.value["Status"], 400);
    }

    #[test]
    fn test_collection_envelope() {
        let doc = collection(json!([1, 2]));
        assert_eq!(doc.root, COLLECTION_ROOT);
        assert_eq!(doc.value, json!({ "Objects": [1, 2] }));
    }
}
