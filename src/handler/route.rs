//! Route definitions
//!
//! The runtime form of a configured route: behavior, resolved content type
//! and optional CORS override. Built once at startup and never mutated.

use crate::config::{CorsPolicy, RouteConfig, RouteKind};
use crate::http::mime;

const JSON_CONTENT_TYPE: &str = "application/json";

/// What a route does once its method gate passes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteBehavior {
    /// Serve a file from disk (GET/HEAD)
    Static { file_path: String },
    /// Serve a configured string verbatim (POST)
    JsonBlob { body: String },
    /// Serve the canned challenge payload (POST)
    Dummy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDefinition {
    /// Exact-match request path
    pub path: String,
    pub behavior: RouteBehavior,
    pub content_type: String,
    /// Replaces the global policy for this route when set
    pub cors: Option<CorsPolicy>,
}

impl RouteDefinition {
    pub fn from_config(route: &RouteConfig) -> Self {
        let behavior = match route.kind {
            RouteKind::Static => RouteBehavior::Static {
                file_path: route.file_path.clone().unwrap_or_default(),
            },
            RouteKind::Json => RouteBehavior::JsonBlob {
                body: route.json_content.clone().unwrap_or_default(),
            },
            RouteKind::Dummy => RouteBehavior::Dummy,
        };

        let content_type = match route.content_type.as_deref() {
            Some(ct) if !ct.is_empty() => ct.to_string(),
            _ => default_content_type(&behavior).to_string(),
        };

        Self {
            path: route.path.clone(),
            behavior,
            content_type,
            cors: route.cors.clone(),
        }
    }
}

/// Static routes infer from the file extension, everything else is JSON
fn default_content_type(behavior: &RouteBehavior) -> &'static str {
    match behavior {
        RouteBehavior::Static { file_path } => mime::content_type_for_path(file_path),
        RouteBehavior::JsonBlob { .. } | RouteBehavior::Dummy => JSON_CONTENT_TYPE,
    }
}
