// Configuration module entry point
// Loads the layered configuration and holds the immutable runtime state

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{
    Config, CorsPolicy, HttpConfig, LoggingConfig, PerformanceConfig, RouteConfig, RouteKind,
};

/// Prefix for environment overrides, e.g. `MOCK_CORS_PORT=9000`
pub const ENV_PREFIX: &str = "MOCK_CORS";

/// Directory names searched (under `$HOME` and `/etc`) for a config file
const CONFIG_DIR_NAME: &str = "dummy_http_passkeys";

/// Values supplied on the command line, applied last
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Explicit config file; must exist when given
    pub config_file: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Config {
    /// Load configuration from files, `MOCK_CORS_*` environment variables and CLI overrides
    pub fn load(overrides: &Overrides) -> Result<Self, config::ConfigError> {
        Self::load_with_env(overrides, default_environment())
    }

    /// Load with a caller-supplied environment source
    pub fn load_with_env(
        overrides: &Overrides,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", 8081)?
            .set_default("version", "1.0.0")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("http.max_body_size", 10_485_760)?; // 10MB

        builder = match &overrides.config_file {
            Some(path) => builder.add_source(config::File::with_name(path).required(true)),
            None => {
                // Lowest precedence first: a config in the working directory wins
                let mut b = builder.add_source(
                    config::File::with_name(&format!("/etc/{CONFIG_DIR_NAME}/config"))
                        .required(false),
                );
                if let Ok(home) = std::env::var("HOME") {
                    b = b.add_source(
                        config::File::with_name(&format!("{home}/.{CONFIG_DIR_NAME}/config"))
                            .required(false),
                    );
                }
                b.add_source(config::File::with_name("config").required(false))
            }
        };

        let settings = builder
            .add_source(env)
            .set_override_option("host", overrides.host.clone())?
            .set_override_option("port", overrides.port.map(i64::from))?
            .build()?;

        let mut cfg: Self = settings.try_deserialize()?;
        if cfg.routes.is_empty() {
            cfg.routes = RouteConfig::default_routes();
        }
        Ok(cfg)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        let host = if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        format!("{host}:{}", self.port)
            .parse()
            .map_err(|e| format!("Invalid address '{}:{}': {e}", self.host, self.port))
    }
}

fn default_environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn empty_env() -> config::Environment {
        default_environment().source(Some(HashMap::new()))
    }

    fn env_with(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect::<HashMap<_, _>>();
        default_environment().source(Some(map))
    }

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn overrides_for(file: &tempfile::NamedTempFile) -> Overrides {
        Overrides {
            config_file: Some(file.path().to_string_lossy().into_owned()),
            ..Overrides::default()
        }
    }

    #[test]
    fn test_defaults() {
        let file = write_config("version: \"1.0.0\"\n");
        let cfg = Config::load_with_env(&overrides_for(&file), empty_env()).unwrap();

        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.version, "1.0.0");
        assert_eq!(cfg.routes.len(), 1);
        assert_eq!(cfg.routes[0].path, "/v1/json/begin");
        assert_eq!(cfg.routes[0].kind, RouteKind::Dummy);
        assert_eq!(
            cfg.routes[0].content_type.as_deref(),
            Some("application/json")
        );
        assert_eq!(cfg.cors.allow_origins, vec!["*"]);
        assert_eq!(cfg.cors.allow_methods, vec!["GET", "POST", "OPTIONS"]);
        assert!(cfg.cors.allow_credentials);
        assert_eq!(cfg.cors.max_age, 86_400);
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.http.max_body_size, 10_485_760);
    }

    #[test]
    fn test_env_overrides_port() {
        let file = write_config("version: \"1.0.0\"\n");
        let cfg = Config::load_with_env(
            &overrides_for(&file),
            env_with(&[("MOCK_CORS_PORT", "9000")]),
        )
        .unwrap();
        assert_eq!(cfg.port, 9000);
    }

    #[test]
    fn test_cli_override_beats_env() {
        let file = write_config("port: 7000\n");
        let mut overrides = overrides_for(&file);
        overrides.port = Some(7100);
        let cfg =
            Config::load_with_env(&overrides, env_with(&[("MOCK_CORS_PORT", "9000")])).unwrap();
        assert_eq!(cfg.port, 7100);
    }

    #[test]
    fn test_file_routes_and_cors_replace_defaults() {
        let file = write_config(
            r#"
port: 9090
cors:
  allow_origins: ["https://example.com"]
  allow_methods: ["POST"]
  allow_headers: ["Content-Type"]
  allow_credentials: false
  max_age: 600
routes:
  - path: /static
    type: static
    file_path: ./static/example.html
  - path: /json
    type: json
    json_content: '{"test": true}'
    cors:
      allow_origins: ["https://route.example"]
      allow_methods: ["POST"]
      allow_headers: []
      allow_credentials: true
      max_age: 60
  - path: /legacy
    type: something_else
"#,
        );
        let cfg = Config::load_with_env(&overrides_for(&file), empty_env()).unwrap();

        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.cors.allow_origins, vec!["https://example.com"]);
        assert!(!cfg.cors.allow_credentials);
        assert_eq!(cfg.cors.max_age, 600);
        assert_eq!(cfg.routes.len(), 3);
        assert_eq!(cfg.routes[0].kind, RouteKind::Static);
        assert_eq!(
            cfg.routes[0].file_path.as_deref(),
            Some("./static/example.html")
        );
        assert_eq!(cfg.routes[1].kind, RouteKind::Json);
        assert_eq!(
            cfg.routes[1].json_content.as_deref(),
            Some(r#"{"test": true}"#)
        );
        let route_cors = cfg.routes[1].cors.as_ref().unwrap();
        assert_eq!(route_cors.allow_origins, vec!["https://route.example"]);
        assert!(route_cors.allow_headers.is_empty());
        assert_eq!(cfg.routes[2].kind, RouteKind::Dummy);
    }

    #[test]
    fn test_route_without_type_is_dummy() {
        let file = write_config("routes:\n  - path: /x\n");
        let cfg = Config::load_with_env(&overrides_for(&file), empty_env()).unwrap();
        assert_eq!(cfg.routes.len(), 1);
        assert_eq!(cfg.routes[0].path, "/x");
        assert_eq!(cfg.routes[0].kind, RouteKind::Dummy);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let overrides = Overrides {
            config_file: Some("/nonexistent/mock-cors/config.yaml".to_string()),
            ..Overrides::default()
        };
        assert!(Config::load_with_env(&overrides, empty_env()).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let file = write_config("host: 127.0.0.1\nport: 8082\n");
        let cfg = Config::load_with_env(&overrides_for(&file), empty_env()).unwrap();
        assert_eq!(
            cfg.get_socket_addr().unwrap(),
            "127.0.0.1:8082".parse().unwrap()
        );

        let mut cfg = cfg;
        cfg.host = "::1".to_string();
        assert_eq!(cfg.get_socket_addr().unwrap(), "[::1]:8082".parse().unwrap());

        cfg.host = "not a host".to_string();
        assert!(cfg.get_socket_addr().is_err());
    }
}
