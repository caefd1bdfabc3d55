//! Dummy challenge route
//!
//! Answers POST with a canned challenge payload. `challenge` and `sessionId`
//! are fixed so clients under test see reproducible values; only the
//! timestamp changes per call.

use chrono::{SecondsFormat, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Response};
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::http;

pub const ALLOW: &str = "POST, OPTIONS";

const CHALLENGE: &str = "abc123xyz789";
const SESSION_ID: &str = "12345-67890-abcde-fghij";
/// Five minutes
const EXPIRES_IN_SECONDS: u64 = 300;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DummyResponseBody {
    pub status: String,
    pub challenge: String,
    /// RFC 3339, UTC, nanosecond precision
    pub timestamp: String,
    pub expires_in: u64,
    pub session_id: String,
}

impl DummyResponseBody {
    pub fn now() -> Self {
        Self {
            status: "success".to_string(),
            challenge: CHALLENGE.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
            expires_in: EXPIRES_IN_SECONDS,
            session_id: SESSION_ID.to_string(),
        }
    }
}

pub fn serve_dummy(method: &Method, content_type: &str) -> Result<Response<Full<Bytes>>, RouteError> {
    if *method != Method::POST {
        return Err(RouteError::MethodNotAllowed {
            method: method.to_string(),
            allow: ALLOW,
        });
    }

    let mut body = serde_json::to_vec(&DummyResponseBody::now())
        .map_err(|e| RouteError::Misconfiguration(format!("failed to encode dummy body: {e}")))?;
    body.push(b'\n');

    Ok(http::build_ok_response(Bytes::from(body), content_type, false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_post_returns_challenge() {
        let resp = serve_dummy(&Method::POST, "application/json").unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Type"], "application/json");

        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let parsed: DummyResponseBody = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.status, "success");
        assert_eq!(parsed.expires_in, 300);
        assert!(!parsed.challenge.is_empty());
        assert!(!parsed.session_id.is_empty());
        assert!(DateTime::parse_from_rfc3339(&parsed.timestamp).is_ok());
        assert!(parsed.timestamp.ends_with('Z'));
    }

    #[tokio::test]
    async fn test_wire_field_names() {
        let resp = serve_dummy(&Method::POST, "application/json").unwrap();
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        for field in ["status", "challenge", "timestamp", "expiresIn", "sessionId"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn test_other_methods_not_allowed() {
        for method in [Method::GET, Method::PUT, Method::DELETE] {
            let err = serve_dummy(&method, "application/json").unwrap_err();
            assert_eq!(err.status(), 405, "{method}");
        }
    }

    #[test]
    fn test_tokens_are_stable() {
        let a = DummyResponseBody::now();
        let b = DummyResponseBody::now();
        assert_eq!(a.challenge, b.challenge);
        assert_eq!(a.session_id, b.session_id);
    }
}
