//! Transport adapter
//!
//! Entry point for HTTP requests: buffers the body, builds the request
//! context, dispatches and writes the access log.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Instant;

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{CONTENT_LENGTH, REFERER, USER_AGENT};
use hyper::{Request, Response};

use super::RequestContext;
use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};

/// Handle one request against the shared application state
pub async fn handle_request<B>(
    req: Request<B>,
    state: &AppState,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let started = Instant::now();
    let server_name = state.config.http.server_name.as_str();
    let max_body_size = state.config.http.max_body_size;

    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = version_label(req.version()).to_string();
    entry.referer = header_text(&req, REFERER.as_str());
    entry.user_agent = header_text(&req, USER_AGENT.as_str());

    let response = match read_context(req, max_body_size).await {
        Ok(ctx) => {
            let api_response = state.api.dispatch(&ctx);
            entry.content_type = Some(api_response.content_type.clone());
            http::build_api_response(api_response, server_name)
        }
        Err(BodyError::TooLarge) => http::build_413_response(server_name),
        Err(BodyError::Unreadable(reason)) => {
            logger::log_warning(&format!("Failed to read request body: {reason}"));
            http::build_400_response(server_name)
        }
    };

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = usize::try_from(response.body().size_hint().lower()).unwrap_or(0);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

enum BodyError {
    TooLarge,
    Unreadable(String),
}

/// Split the request into a context, buffering at most `max_body_size` bytes
async fn read_context<B>(req: Request<B>, max_body_size: u64) -> Result<RequestContext, BodyError>
where
    B: Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    if declared_length(&req).is_some_and(|len| len > max_body_size) {
        logger::log_warning(&format!(
            "Request body too large (max: {max_body_size} bytes)"
        ));
        return Err(BodyError::TooLarge);
    }

    let (parts, body) = req.into_parts();
    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) if err.downcast_ref::<LengthLimitError>().is_some() => {
            return Err(BodyError::TooLarge)
        }
        Err(err) => return Err(BodyError::Unreadable(err.to_string())),
    };

    Ok(RequestContext {
        method: parts.method,
        path: parts.uri.path().to_string(),
        query: parts.uri.query().map(ToString::to_string),
        headers: parts.headers,
        body,
    })
}

/// Content-Length header, when present and numeric
fn declared_length<B>(req: &Request<B>) -> Option<u64> {
    req.headers()
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

fn header_text<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

const fn version_label(version: hyper::Version) -> &'static str {
    match version {
        hyper::Version::HTTP_09 => "0.9",
        hyper::Version::HTTP_10 => "1.0",
        hyper::Version::HTTP_2 => "2",
        hyper::Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
