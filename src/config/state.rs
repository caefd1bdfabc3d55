// Application state module
// Immutable snapshot shared by every connection task

use super::types::Config;
use crate::error::StartupError;
use crate::handler::Router;

/// Application state
///
/// Built once at startup and shared behind an `Arc`; nothing in here is
/// mutated while serving, so request handling takes no locks.
pub struct AppState {
    pub config: Config,
    pub router: Router,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, StartupError> {
        let router = Router::from_config(&config)?;
        Ok(Self { config, router })
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}
