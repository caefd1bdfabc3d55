//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: body-size gate, exact path
//! lookup, CORS header resolution, preflight short-circuit and dispatch to the
//! route's behavior.

use crate::config::{AppState, Config, CorsPolicy};
use crate::error::{RouteError, StartupError};
use crate::handler::{dummy, json_blob, static_files, RouteBehavior, RouteDefinition};
use crate::http::{self, CorsHeaders};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_LENGTH, ORIGIN, USER_AGENT};
use hyper::{Method, Request, Response};
use std::collections::HashMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Per-request view used for dispatch; never outlives the request
pub struct RequestContext<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// Empty when the request carried no Origin header
    pub origin: &'a str,
}

/// Immutable table of exact-match routes plus the global CORS policy
#[derive(Debug)]
pub struct Router {
    routes: HashMap<String, RouteDefinition>,
    global_cors: CorsPolicy,
}

impl Router {
    /// Build the table, rejecting relative or duplicate paths and content
    /// types that cannot be sent as a header
    pub fn new(
        definitions: Vec<RouteDefinition>,
        global_cors: CorsPolicy,
    ) -> Result<Self, StartupError> {
        let mut routes = HashMap::with_capacity(definitions.len());
        for def in definitions {
            if !def.path.starts_with('/') {
                return Err(StartupError::Routes(format!(
                    "route path '{}' must start with '/'",
                    def.path
                )));
            }
            if routes.contains_key(&def.path) {
                return Err(StartupError::Routes(format!(
                    "duplicate route path '{}'",
                    def.path
                )));
            }
            if HeaderValue::from_str(&def.content_type).is_err() {
                return Err(StartupError::Routes(format!(
                    "route '{}' has invalid content type '{}'",
                    def.path, def.content_type
                )));
            }
            routes.insert(def.path.clone(), def);
        }
        Ok(Self {
            routes,
            global_cors,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let definitions = config
            .routes
            .iter()
            .map(RouteDefinition::from_config)
            .collect();
        Self::new(definitions, config.cors.clone())
    }

    pub fn lookup(&self, path: &str) -> Option<&RouteDefinition> {
        self.routes.get(path)
    }

    /// Route override if present, else the global policy
    pub fn effective_policy<'a>(&'a self, route: &'a RouteDefinition) -> &'a CorsPolicy {
        route.cors.as_ref().unwrap_or(&self.global_cors)
    }

    /// CORS headers for a configured path, `None` when the path is unknown
    pub fn cors_for(&self, path: &str, origin: &str) -> Option<CorsHeaders> {
        self.lookup(path)
            .map(|route| CorsHeaders::resolve(self.effective_policy(route), origin))
    }

    /// Produce the response for a request
    ///
    /// Unmatched paths get a plain 404 without CORS headers. Matched paths
    /// always carry the route's CORS headers, including on errors.
    pub async fn dispatch(&self, ctx: &RequestContext<'_>) -> Response<Full<Bytes>> {
        let Some(route) = self.lookup(ctx.path) else {
            return http::build_404_response();
        };

        let cors = CorsHeaders::resolve(self.effective_policy(route), ctx.origin);

        let mut response = if *ctx.method == Method::OPTIONS {
            http::build_preflight_response()
        } else {
            match execute(ctx.method, route).await {
                Ok(resp) => resp,
                Err(err) => {
                    let message =
                        format!("{} {} -> {}: {err}", ctx.method, ctx.path, err.status());
                    if matches!(err, RouteError::Misconfiguration(_)) {
                        logger::log_error(&message);
                    } else {
                        logger::log_debug(&message);
                    }
                    err.into_response()
                }
            }
        };

        cors.apply(response.headers_mut());
        response
    }
}

/// Run the route's behavior behind its method gate
async fn execute(
    method: &Method,
    route: &RouteDefinition,
) -> Result<Response<Full<Bytes>>, RouteError> {
    match &route.behavior {
        RouteBehavior::Static { file_path } => {
            static_files::serve_file(method, file_path, &route.content_type).await
        }
        RouteBehavior::JsonBlob { body } => {
            json_blob::serve_json_blob(method, body, &route.content_type)
        }
        RouteBehavior::Dummy => dummy::serve_dummy(method, &route.content_type),
    }
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type works.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let (parts, body) = req.into_parts();
    drop(body);

    let origin = header_str(&parts.headers, ORIGIN);
    let path = parts.uri.path();

    let response = match check_body_size(&parts.headers, state.config.http.max_body_size) {
        Some(mut resp) => {
            if let Some(cors) = state.router.cors_for(path, origin.unwrap_or_default()) {
                cors.apply(resp.headers_mut());
            }
            resp
        }
        None => {
            let ctx = RequestContext {
                method: &parts.method,
                path,
                origin: origin.unwrap_or_default(),
            };
            state.router.dispatch(&ctx).await
        }
    };

    if state.access_log_enabled() {
        let mut entry = AccessLogEntry::new(remote_addr, parts.method.to_string(), path.to_string());
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = format!("{:?}", parts.version)
            .trim_start_matches("HTTP/")
            .to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.origin = origin.map(ToString::to_string);
        entry.user_agent = header_str(&parts.headers, USER_AGENT).map(ToString::to_string);
        entry.duration = start.elapsed();
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(CONTENT_LENGTH)?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_warning(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}
