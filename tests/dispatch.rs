use hyper::{Method, StatusCode};
use restitude::resource::{GetItem, HandlerResult, Resource};
use restitude::widgets::WidgetResource;
use restitude::{Api, ApiBuilder, RequestContext};
use serde_json::{json, Value};

fn api() -> Api {
    ApiBuilder::new("/api/")
        .register(WidgetResource::with_names(["gear", "cog"]))
        .build()
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[test]
fn collection_get_returns_json() {
    let response = api().dispatch(&RequestContext::new(Method::GET, "/api/widget"));

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/json");
    assert_eq!(
        json(&response.body),
        json!([
            { "id": "1", "name": "gear", "quantity": 0 },
            { "id": "2", "name": "cog", "quantity": 0 }
        ])
    );
}

#[test]
fn unsupported_verb_is_a_routing_miss() {
    let response = api().dispatch(&RequestContext::new(Method::DELETE, "/api/widget"));

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(
        json(&response.body),
        json!({
            "Message": "No resource found matching the given request.",
            "Status": 404
        })
    );
}

#[test]
fn unknown_resource_is_a_routing_miss() {
    let response = api().dispatch(&RequestContext::new(Method::GET, "/api/gadget/1"));
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[test]
fn api_root_is_not_implemented() {
    let response = api().dispatch(&RequestContext::new(Method::GET, "/api/"));

    assert_eq!(response.status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(
        json(&response.body)["Message"],
        "Support for generating schemas is not yet implemented."
    );
}

#[test]
fn created_widget_is_readable() {
    let api = api();
    let created = api.dispatch(
        &RequestContext::new(Method::POST, "/api/widget")
            .with_header("Content-Type", "application/json")
            .with_body(r#"{"name":"sprocket","quantity":4}"#),
    );
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(json(&created.body)["id"], "3");

    let fetched = api.dispatch(&RequestContext::new(Method::GET, "/api/widget/3"));
    assert_eq!(
        json(&fetched.body),
        json!({ "id": "3", "name": "sprocket", "quantity": 4 })
    );
}

#[test]
fn handler_error_keeps_its_status() {
    let api = api();

    let missing = api.dispatch(&RequestContext::new(Method::GET, "/api/widget/99"));
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(json(&missing.body)["Message"], "Widget '99' not found");

    let invalid = api.dispatch(
        &RequestContext::new(Method::PUT, "/api/widget/1").with_body("{not json"),
    );
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(json(&invalid.body)["Status"], 400);
}

#[test]
fn accept_header_selects_xml() {
    let response = api().dispatch(
        &RequestContext::new(Method::GET, "/api/widget/2")
            .with_header("Accept", "text/html, application/xml;q=0.9"),
    );

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.content_type, "application/xml");
    let body = String::from_utf8(response.body.to_vec()).unwrap();
    assert!(body.starts_with("<Response>"), "{body}");
    assert!(body.contains("<name>cog</name>"), "{body}");
}

#[test]
fn unknown_accept_falls_back_to_json() {
    let response = api().dispatch(
        &RequestContext::new(Method::GET, "/api/widget").with_header("Accept", "text/csv"),
    );
    assert_eq!(response.content_type, "application/json");
}

#[test]
fn wrapped_collections() {
    let api = ApiBuilder::new("/api/")
        .wrap_collections(true)
        .register(WidgetResource::with_names(["gear"]))
        .build();

    let response = api.dispatch(&RequestContext::new(Method::GET, "/api/widget"));
    assert_eq!(
        json(&response.body),
        json!({ "Objects": [{ "id": "1", "name": "gear", "quantity": 0 }] })
    );

    let item = api.dispatch(&RequestContext::new(Method::GET, "/api/widget/1"));
    assert_eq!(json(&item.body)["name"], "gear");
}

struct Lookup(&'static str);

impl GetItem for Lookup {
    fn get_item(&self, identifier: &str, _ctx: &RequestContext) -> HandlerResult {
        Ok(json!({ "source": self.0, "identifier": identifier }))
    }
}

impl Resource for Lookup {
    fn base_name(&self) -> Option<String> {
        Some("lookup".to_string())
    }

    fn as_get_item(&self) -> Option<&dyn GetItem> {
        Some(self)
    }
}

#[test]
fn later_registration_wins() {
    let api = ApiBuilder::new("/api/")
        .register(Lookup("first"))
        .register(Lookup("second"))
        .build();

    let response = api.dispatch(&RequestContext::new(Method::GET, "/api/lookup/a/b"));
    assert_eq!(
        json(&response.body),
        json!({ "source": "second", "identifier": "a/b" })
    );
    assert_eq!(api.resources(), vec!["lookup"]);
}
