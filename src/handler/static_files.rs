//! Static file serving module
//!
//! Serves one configured file per route. No range or conditional requests.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use std::io::ErrorKind;
use tokio::fs;

use crate::error::RouteError;
use crate::http;
use crate::logger;

/// Methods accepted by static routes, as sent in `Allow`
pub const ALLOW: &str = "GET, HEAD, OPTIONS";

/// Serve `file_path` for a GET or HEAD request
pub async fn serve_file(
    method: &Method,
    file_path: &str,
    content_type: &str,
) -> Result<Response<Full<Bytes>>, RouteError> {
    if *method != Method::GET && *method != Method::HEAD {
        return Err(RouteError::MethodNotAllowed {
            method: method.to_string(),
            allow: ALLOW,
        });
    }

    let content = match fs::read(file_path).await {
        Ok(c) => c,
        // File not found is common (404), no need to log at warning level
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(RouteError::NotFound(file_path.to_string()));
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{file_path}': {e}"));
            return Err(RouteError::Misconfiguration(format!(
                "unreadable static file '{file_path}'"
            )));
        }
    };

    Ok(http::build_ok_response(
        Bytes::from(content),
        content_type,
        *method == Method::HEAD,
    ))
}
