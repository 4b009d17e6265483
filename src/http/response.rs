//! HTTP response building module
//!
//! Turns dispatcher results into hyper responses. Builder failures never
//! panic: they are logged and answered with a bare response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_TYPE, SERVER};
use hyper::{Response, StatusCode};

use crate::api::ApiResponse;

/// Response carrying an encoded dispatcher result
pub fn build_api_response(response: ApiResponse, server_name: &str) -> Response<Full<Bytes>> {
    let status = response.status;
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, response.content_type)
        .header(SERVER, server_name)
        .body(Full::new(response.body))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status)
        })
}

/// 413 Payload Too Large response
pub fn build_413_response(server_name: &str) -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::PAYLOAD_TOO_LARGE, "413 Payload Too Large", server_name)
}

/// 400 Bad Request response for bodies that could not be read
pub fn build_400_response(server_name: &str) -> Response<Full<Bytes>> {
    build_plain_response(StatusCode::BAD_REQUEST, "400 Bad Request", server_name)
}

fn build_plain_response(
    status: StatusCode,
    text: &'static str,
    server_name: &str,
) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "text/plain")
        .header(SERVER, server_name)
        .body(Full::new(Bytes::from(text)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            fallback(status)
        })
}

fn fallback(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
