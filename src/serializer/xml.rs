// XML encoding of response documents
//
// Objects become child elements named by their keys, arrays repeat the
// element of the key holding them, null becomes an empty element. An array
// nested in an array becomes one element whose entries are `item`s.
// Characters XML 1.0 cannot carry are replaced with U+FFFD.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use serde_json::Value;

use super::{Document, XML};
use crate::error::EncodeError;

/// Element name for array entries without a key of their own
const ITEM: &str = "item";

pub fn encode_xml(doc: &Document) -> Result<Vec<u8>, EncodeError> {
    let mut writer = Writer::new(Vec::new());
    match &doc.value {
        // Root arrays keep a single root element around their entries
        Value::Array(items) => {
            start(&mut writer, doc.root)?;
            write_entries(&mut writer, ITEM, items)?;
            end(&mut writer, doc.root)?;
        }
        value => write_element(&mut writer, doc.root, value)?,
    }
    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> Result<(), EncodeError> {
    check_name(name)?;
    match value {
        Value::Null => emit(writer, Event::Empty(BytesStart::new(name))),
        Value::Bool(b) => write_text(writer, name, if *b { "true" } else { "false" }),
        Value::Number(n) => write_text(writer, name, &n.to_string()),
        Value::String(s) => write_text(writer, name, s),
        Value::Array(items) => write_entries(writer, name, items),
        Value::Object(fields) => {
            start(writer, name)?;
            for (key, field) in fields {
                write_element(writer, key, field)?;
            }
            end(writer, name)
        }
    }
}

/// One `name` element per entry; nested arrays keep their own element
fn write_entries(writer: &mut Writer<Vec<u8>>, name: &str, items: &[Value]) -> Result<(), EncodeError> {
    check_name(name)?;
    for item in items {
        if let Value::Array(inner) = item {
            start(writer, name)?;
            write_entries(writer, ITEM, inner)?;
            end(writer, name)?;
        } else {
            write_element(writer, name, item)?;
        }
    }
    Ok(())
}

fn write_text(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<(), EncodeError> {
    start(writer, name)?;
    emit(writer, Event::Text(BytesText::new(&sanitize(text))))?;
    end(writer, name)
}

fn start(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), EncodeError> {
    emit(writer, Event::Start(BytesStart::new(name)))
}

fn end(writer: &mut Writer<Vec<u8>>, name: &str) -> Result<(), EncodeError> {
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), EncodeError> {
    writer
        .write_event(event)
        .map_err(|e| EncodeError::new(XML, e))
}

/// Replace characters outside the XML 1.0 `Char` production
fn sanitize(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(
            text.chars()
                .map(|c| if is_xml_char(c) { c } else { char::REPLACEMENT_CHARACTER })
                .collect(),
        )
    }
}

const fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Reject keys that cannot be used as element names
fn check_name(name: &str) -> Result<(), EncodeError> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    let reserved = name.get(..3).is_some_and(|p| p.eq_ignore_ascii_case("xml"));

    if valid_start && valid_rest && !reserved {
        Ok(())
    } else {
        Err(EncodeError::new(XML, format!("invalid element name {name:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode(root: &'static str, value: Value) -> String {
        String::from_utf8(encode_xml(&Document::new(root, value)).unwrap()).unwrap()
    }

    #[test]
    fn test_error_envelope() {
        let xml = encode("ErrorResponse", json!({"Message": "No resource found"}));
        assert_eq!(
            xml,
            "<ErrorResponse><Message>No resource found</Message></ErrorResponse>"
        );
    }

    #[test]
    fn test_collection_repeats_key() {
        let xml = encode("CollectionResponse", json!({"Objects": ["a", "b"]}));
        assert_eq!(
            xml,
            "<CollectionResponse><Objects>a</Objects><Objects>b</Objects></CollectionResponse>"
        );
    }

    #[test]
    fn test_root_array_uses_items() {
        let xml = encode("Response", json!([1, {"id": 2}]));
        assert_eq!(
            xml,
            "<Response><item>1</item><item><id>2</id></item></Response>"
        );
    }

    #[test]
    fn test_scalars_and_null() {
        assert_eq!(encode("Response", json!(true)), "<Response>true</Response>");
        assert_eq!(encode("Response", json!(null)), "<Response/>");
        assert_eq!(
            encode("Response", json!({"gone": null})),
            "<Response><gone/></Response>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = encode("Response", json!({"name": "<a & b>"}));
        assert_eq!(xml, "<Response><name>&lt;a &amp; b&gt;</name></Response>");
    }

    #[test]
    fn test_invalid_key_fails() {
        let err = encode_xml(&Document::new("Response", json!({"1st": true}))).unwrap_err();
        assert_eq!(err.content_type, XML);
        assert!(err.reason.contains("1st"));

        assert!(encode_xml(&Document::new("Response", json!({"has space": 1}))).is_err());
        assert!(encode_xml(&Document::new("Response", json!({"xmlns": 1}))).is_err());
    }

    #[test]
    fn test_control_characters_replaced() {
        let xml = encode("Response", json!({"name": "a\u{1}b\u{B}c\u{FFFE}"}));
        assert_eq!(
            xml,
            "<Response><name>a\u{FFFD}b\u{FFFD}c\u{FFFD}</name></Response>"
        );
        assert_eq!(
            encode("Response", json!({"name": "tab\there\nline"})),
            "<Response><name>tab\there\nline</name></Response>"
        );
    }

    #[test]
    fn test_nested_arrays_keep_grouping() {
        assert_eq!(
            encode("Response", json!({"a": [[1, 2], [3]]})),
            "<Response><a><item>1</item><item>2</item></a><a><item>3</item></a></Response>"
        );
        assert_eq!(
            encode("Response", json!({"a": [1, 2, 3]})),
            "<Response><a>1</a><a>2</a><a>3</a></Response>"
        );
        assert_eq!(
            encode("Response", json!([[1], 2])),
            "<Response><item><item>1</item></item><item>2</item></Response>"
        );
    }
}
