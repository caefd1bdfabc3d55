//! JSON blob route
//!
//! Serves the configured string verbatim; it is never parsed or re-serialized.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};

use crate::error::RouteError;
use crate::http;

pub const ALLOW: &str = "POST, OPTIONS";

pub fn serve_json_blob(
    method: &Method,
    body: &str,
    content_type: &str,
) -> Result<Response<Full<Bytes>>, RouteError> {
    if *method != Method::POST {
        return Err(RouteError::MethodNotAllowed {
            method: method.to_string(),
            allow: ALLOW,
        });
    }

    if body.is_empty() {
        return Err(RouteError::Misconfiguration(
            "no JSON content configured".to_string(),
        ));
    }

    Ok(http::build_ok_response(
        Bytes::copy_from_slice(body.as_bytes()),
        content_type,
        false,
    ))
}
