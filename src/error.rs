//! Error types
//!
//! `RouteError` is terminal for a single request and maps onto a status code.
//! `StartupError` aborts the process before it begins serving.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use thiserror::Error;

use crate::http;

/// Per-request failure raised by a route handler
#[derive(Debug, Error)]
pub enum RouteError {
    /// Wrong method for the route kind
    #[error("Method not allowed: {method}")]
    MethodNotAllowed {
        method: String,
        allow: &'static str,
    },

    /// Static file does not exist
    #[error("File not found: {0}")]
    NotFound(String),

    /// Route is configured in a way that cannot be served
    #[error("Server misconfiguration: {0}")]
    Misconfiguration(String),
}

impl RouteError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Misconfiguration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convert into the minimal plaintext response sent to the client
    pub fn into_response(self) -> Response<Full<Bytes>> {
        match self {
            Self::MethodNotAllowed { allow, .. } => http::build_405_response(allow),
            Self::NotFound(_) => http::build_404_response(),
            Self::Misconfiguration(_) => http::build_500_response(),
        }
    }
}

/// Failure that prevents the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid route table: {0}")]
    Routes(String),

    #[error("Invalid address: {0}")]
    Address(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = RouteError::MethodNotAllowed {
            method: "PUT".to_string(),
            allow: "POST, OPTIONS",
        };
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            RouteError::NotFound("a.txt".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RouteError::Misconfiguration("empty".to_string()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_into_response_keeps_status() {
        let resp = RouteError::MethodNotAllowed {
            method: "GET".to_string(),
            allow: "POST, OPTIONS",
        }
        .into_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "POST, OPTIONS");

        let resp = RouteError::Misconfiguration("no json".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
