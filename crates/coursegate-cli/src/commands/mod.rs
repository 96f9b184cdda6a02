pub mod complete;
pub mod config;
pub mod countdown;
pub mod flash;
pub mod redirect;
pub mod validate;

use coursegate_core::error::ConfigError;
use coursegate_core::{Config, UserAlerts};
use std::path::Path;

/// Load the config from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    tracing::debug!(path = ?path, "loading config");
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Blocking notifications on a terminal are just lines on stderr.
pub struct ConsoleAlerts;

impl UserAlerts for ConsoleAlerts {
    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }
}
