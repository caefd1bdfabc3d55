//! CORS header resolution module
//!
//! Turns the active `CorsPolicy` and the request `Origin` into the set of
//! `Access-Control-*` headers attached to a response.

use hyper::header::{
    HeaderMap, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_MAX_AGE,
};

use crate::config::CorsPolicy;
use crate::logger;

const WILDCARD: &str = "*";

/// Resolved CORS headers for one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsHeaders {
    /// Echoed request origin, only when allowed
    pub allow_origin: Option<String>,
    pub allow_methods: String,
    pub allow_headers: String,
    pub allow_credentials: bool,
    pub max_age: u64,
}

impl CorsHeaders {
    /// Resolve headers for a request carrying `origin` (empty if absent)
    pub fn resolve(policy: &CorsPolicy, origin: &str) -> Self {
        let allow_origin = is_origin_allowed(policy, origin).then(|| origin.to_string());

        Self {
            allow_origin,
            allow_methods: policy.allow_methods.join(", "),
            allow_headers: policy.allow_headers.join(", "),
            allow_credentials: policy.allow_credentials,
            max_age: policy.max_age,
        }
    }

    /// Write the headers into a response header map
    pub fn apply(&self, headers: &mut HeaderMap) {
        if let Some(origin) = &self.allow_origin {
            insert(headers, ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        }
        insert(headers, ACCESS_CONTROL_ALLOW_METHODS, &self.allow_methods);
        insert(headers, ACCESS_CONTROL_ALLOW_HEADERS, &self.allow_headers);
        if self.allow_credentials {
            headers.insert(
                ACCESS_CONTROL_ALLOW_CREDENTIALS,
                HeaderValue::from_static("true"),
            );
        }
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(self.max_age));
    }
}

/// An origin is allowed when non-empty and either listed or covered by `*`
pub fn is_origin_allowed(policy: &CorsPolicy, origin: &str) -> bool {
    !origin.is_empty()
        && policy
            .allow_origins
            .iter()
            .any(|allowed| allowed == origin || allowed == WILDCARD)
}

fn insert(headers: &mut HeaderMap, name: hyper::header::HeaderName, value: &str) {
    match HeaderValue::from_str(value) {
        Ok(v) => {
            headers.insert(name, v);
        }
        Err(e) => logger::log_warning(&format!("Skipping invalid {name} value '{value}': {e}")),
    }
}
