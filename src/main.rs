use clap::Parser;
use std::sync::Arc;

mod config;
mod error;
mod handler;
mod http;
mod logger;
mod server;

use error::StartupError;

/// A dummy HTTP mock CORS server with configurable routes and CORS settings,
/// intended for testing and development.
#[derive(Debug, Parser)]
#[command(name = "mock-cors-server", version)]
struct Cli {
    /// Config file (default: config.* in ., ~/.dummy_http_passkeys or /etc/dummy_http_passkeys)
    #[arg(short, long)]
    config: Option<String>,

    /// Port to run the server on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let overrides = config::Overrides {
        config_file: cli.config,
        host: cli.host,
        port: cli.port,
    };
    let cfg = config::Config::load(&overrides).map_err(StartupError::from)?;
    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))?;
    Ok(())
}

async fn async_main(cfg: config::Config) -> Result<(), StartupError> {
    let addr = cfg.get_socket_addr().map_err(StartupError::Address)?;
    let state = Arc::new(config::AppState::new(cfg)?);
    let listener = server::create_listener(addr)?;

    logger::log_server_start(&listener.local_addr()?, &state.config);
    server::start_server_loop(listener, state, server::shutdown_signal()).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from(["mock-cors-server", "-p", "9000", "--config", "mock.yaml"]);
        assert_eq!(cli.port, Some(9000));
        assert_eq!(cli.config.as_deref(), Some("mock.yaml"));
        assert!(cli.host.is_none());
    }
}
