// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Configuration is read from `$XDG_CONFIG_HOME/ys/config.toml` (or the file
//! named by `YS_CONFIG`). Every field has a default, so a missing file is the
//! same as an empty one.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ys_core::backoff::Backoff;

use crate::env;
use crate::error::{Error, Result};

const APP_DIR_NAME: &str = "ys";
const CONFIG_FILE_NAME: &str = "config.toml";
const CREDENTIALS_FILE_NAME: &str = "credentials.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Agency API, authenticated with the stored credentials.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Public API for token-scoped calls (offers, location submission).
    #[serde(default = "default_main_api_base_url")]
    pub main_api_base_url: String,
    /// Push host.
    #[serde(default = "default_ws_base_url")]
    pub ws_base_url: String,
    #[serde(default = "default_initial_reconnect_delay_ms")]
    pub initial_reconnect_delay_ms: u64,
    #[serde(default = "default_request_channel_max_delay_ms")]
    pub request_channel_max_delay_ms: u64,
    #[serde(default = "default_location_channel_max_delay_ms")]
    pub location_channel_max_delay_ms: u64,
    /// Upper bound for acquiring a device position.
    #[serde(default = "default_geolocation_timeout_ms")]
    pub geolocation_timeout_ms: u64,
    /// Per-call HTTP timeout.
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_path: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    "https://api.yolsepetigo.com/insurance".to_string()
}

fn default_main_api_base_url() -> String {
    "https://api.yolsepetigo.com".to_string()
}

fn default_ws_base_url() -> String {
    "wss://api.yolsepetigo.com".to_string()
}

fn default_initial_reconnect_delay_ms() -> u64 {
    1_000
}

fn default_request_channel_max_delay_ms() -> u64 {
    30_000
}

fn default_location_channel_max_delay_ms() -> u64 {
    15_000
}

fn default_geolocation_timeout_ms() -> u64 {
    15_000
}

fn default_http_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: default_api_base_url(),
            main_api_base_url: default_main_api_base_url(),
            ws_base_url: default_ws_base_url(),
            initial_reconnect_delay_ms: default_initial_reconnect_delay_ms(),
            request_channel_max_delay_ms: default_request_channel_max_delay_ms(),
            location_channel_max_delay_ms: default_location_channel_max_delay_ms(),
            geolocation_timeout_ms: default_geolocation_timeout_ms(),
            http_timeout_secs: default_http_timeout_secs(),
            credentials_path: None,
        }
    }
}

impl Config {
    /// Loads the configuration at `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(Error::Config(format!("failed to read config: {}", e))),
        };
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the configuration from [`config_path`].
    pub fn load_default() -> Result<Self> {
        Config::load(&config_path()?)
    }

    fn validate(&self) -> Result<()> {
        for (name, url, schemes) in [
            ("api_base_url", &self.api_base_url, &["http://", "https://"]),
            ("main_api_base_url", &self.main_api_base_url, &["http://", "https://"]),
            ("ws_base_url", &self.ws_base_url, &["ws://", "wss://"]),
        ] {
            if !schemes.iter().any(|s| url.starts_with(s)) {
                return Err(Error::Config(format!(
                    "{name} '{url}' must start with {}",
                    schemes.join(" or ")
                )));
            }
        }
        for (name, value) in [
            ("initial_reconnect_delay_ms", self.initial_reconnect_delay_ms),
            ("request_channel_max_delay_ms", self.request_channel_max_delay_ms),
            ("location_channel_max_delay_ms", self.location_channel_max_delay_ms),
            ("geolocation_timeout_ms", self.geolocation_timeout_ms),
            ("http_timeout_secs", self.http_timeout_secs),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("{name} must be positive")));
            }
        }
        Ok(())
    }

    /// Renders the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))
    }

    pub fn request_backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.initial_reconnect_delay_ms),
            Duration::from_millis(self.request_channel_max_delay_ms),
        )
    }

    pub fn location_backoff(&self) -> Backoff {
        Backoff::new(
            Duration::from_millis(self.initial_reconnect_delay_ms),
            Duration::from_millis(self.location_channel_max_delay_ms),
        )
    }

    pub fn geolocation_timeout(&self) -> Duration {
        Duration::from_millis(self.geolocation_timeout_ms)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Where credentials are persisted: `YS_CREDENTIALS`, then the config
    /// file's `credentials_path`, then `$XDG_DATA_HOME/ys/credentials.json`.
    pub fn credentials_file(&self) -> Result<PathBuf> {
        if let Some(path) = env::credentials_path() {
            return Ok(path);
        }
        if let Some(path) = &self.credentials_path {
            return Ok(path.clone());
        }
        let data_dir = dirs::data_dir().ok_or_else(|| {
            Error::Config("cannot determine data directory\n  hint: set YS_CREDENTIALS".into())
        })?;
        Ok(data_dir.join(APP_DIR_NAME).join(CREDENTIALS_FILE_NAME))
    }
}

/// Path of the configuration file: `YS_CONFIG` or `$XDG_CONFIG_HOME/ys/config.toml`.
pub fn config_path() -> Result<PathBuf> {
    if let Some(path) = env::config_path() {
        return Ok(path);
    }
    let config_dir = dirs::config_dir().ok_or_else(|| {
        Error::Config("cannot determine config directory\n  hint: set YS_CONFIG".into())
    })?;
    Ok(config_dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
