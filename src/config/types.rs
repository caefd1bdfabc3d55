// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub version: String,
    /// Tokio worker threads (defaults to CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    #[serde(default)]
    pub cors: CorsPolicy,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
}

/// CORS policy, either global or attached to a single route
///
/// Fields missing from configuration take the built-in defaults.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CorsPolicy {
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
    pub allow_credentials: bool,
    /// Preflight cache lifetime in seconds
    pub max_age: u64,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allow_origins: vec!["*".to_string()],
            allow_methods: ["GET", "POST", "OPTIONS"].map(String::from).to_vec(),
            allow_headers: [
                "Content-Type",
                "Authorization",
                "site-token",
                "client-id",
                "placement-id",
                "integrator-id",
                "oauth-type",
            ]
            .map(String::from)
            .to_vec(),
            allow_credentials: true,
            max_age: 86_400,
        }
    }
}

/// Route kind as written in configuration
///
/// Unrecognized values fall back to the dummy behavior.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(from = "String")]
pub enum RouteKind {
    Static,
    Json,
    #[default]
    Dummy,
}

impl From<String> for RouteKind {
    fn from(kind: String) -> Self {
        match kind.to_ascii_lowercase().as_str() {
            "static" => Self::Static,
            "json" | "json_blob" => Self::Json,
            _ => Self::Dummy,
        }
    }
}

/// A single route as written in configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: RouteKind,
    /// File served by static routes
    #[serde(default)]
    pub file_path: Option<String>,
    /// Body served verbatim by json routes
    #[serde(default)]
    pub json_content: Option<String>,
    /// Empty means "infer from kind / file extension"
    #[serde(default)]
    pub content_type: Option<String>,
    /// Route-specific CORS policy, replaces the global one entirely
    #[serde(default)]
    pub cors: Option<CorsPolicy>,
}

impl RouteConfig {
    /// The route served when configuration provides none
    pub fn default_routes() -> Vec<Self> {
        vec![Self {
            path: "/v1/json/begin".to_string(),
            kind: RouteKind::Dummy,
            file_path: None,
            json_content: None,
            content_type: Some("application/json".to_string()),
            cors: None,
        }]
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, json, or custom pattern)
    #[serde(default = "default_access_log_format")]
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}

#[allow(clippy::missing_const_for_fn)]
fn default_access_log_format() -> String {
    "combined".to_string()
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive: bool,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub max_body_size: u64,
}
