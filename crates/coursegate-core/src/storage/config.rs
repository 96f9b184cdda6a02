//! TOML-based application configuration.
//!
//! Stores:
//! - Server origin, optional explicit completion URL and course name
//! - Countdown unlock window, tick period and ready label
//! - Flash message dismiss delay
//!
//! Configuration is stored at `~/.config/coursegate/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use chrono::TimeDelta;

use super::data_dir;
use crate::countdown::MAX_UNLOCK_DELAY_SECS;
use crate::error::ConfigError;

/// Endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Explicit completion URL prefix; the part id and a trailing slash are
    /// appended. When unset the URL is derived from `base_url`.
    #[serde(default)]
    pub update_part_status_url: Option<String>,
    /// Request timeout in seconds. 0 disables the timeout.
    #[serde(default)]
    pub request_timeout_secs: u64,
    /// Course name used when re-navigating after an introduction part.
    #[serde(default)]
    pub course_name: Option<String>,
}

/// Unlock countdown configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownConfig {
    #[serde(default = "default_unlock_delay_secs")]
    pub unlock_delay_secs: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_ready_label")]
    pub ready_label: String,
}

/// Flash message configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashConfig {
    #[serde(default = "default_dismiss_after_secs")]
    pub dismiss_after_secs: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/coursegate/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub countdown: CountdownConfig,
    #[serde(default)]
    pub flash: FlashConfig,
}

// Default functions
fn default_base_url() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_unlock_delay_secs() -> u64 {
    crate::countdown::UNLOCK_DELAY_SECS as u64
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_ready_label() -> String {
    crate::countdown::READY_LABEL.into()
}
fn default_dismiss_after_secs() -> u64 {
    5
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            update_part_status_url: None,
            request_timeout_secs: 0,
            course_name: None,
        }
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            unlock_delay_secs: default_unlock_delay_secs(),
            tick_interval_ms: default_tick_interval_ms(),
            ready_label: default_ready_label(),
        }
    }
}

impl CountdownConfig {
    /// The unlock window as a duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the window exceeds [`MAX_UNLOCK_DELAY_SECS`].
    pub fn unlock_delay(&self) -> Result<TimeDelta, ConfigError> {
        let secs = self.unlock_delay_secs;
        if secs <= MAX_UNLOCK_DELAY_SECS {
            if let Some(delay) = i64::try_from(secs).ok().and_then(TimeDelta::try_seconds) {
                return Ok(delay);
            }
        }
        Err(ConfigError::InvalidValue {
            key: "countdown.unlock_delay_secs".to_string(),
            message: format!("{secs} exceeds the maximum of {MAX_UNLOCK_DELAY_SECS} seconds"),
        })
    }
}

impl Default for FlashConfig {
    fn default() -> Self {
        Self {
            dismiss_after_secs: default_dismiss_after_secs(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => serde_json::Value::Number(
                        value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                            .into(),
                    ),
                    serde_json::Value::Null | serde_json::Value::String(_) if value.is_empty() => {
                        serde_json::Value::Null
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default on-disk location.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/coursegate"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed or holds an
    /// out-of-range value, or if the default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Self =
                    toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Check values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.countdown.unlock_delay().map(|_| ())
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        match Self::get_json_value_by_path(&json, key)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some(String::new()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value in memory by dot-separated key. Call `save` to persist.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// key. The config is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self)
            .map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}
