//! Global configuration parsing and validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{AppError, Result};

/// Outbound notification settings.
///
/// When `webhook_url` is empty the server runs with notifications disabled
/// and sends complete without any delivery attempt.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub struct NotifyConfig {
    /// HTTP endpoint receiving notification payloads (empty = disabled).
    #[serde(default)]
    pub webhook_url: String,
    /// Bearer token attached to webhook requests (populated from the
    /// environment at startup, not from the TOML file).
    #[serde(skip)]
    pub webhook_token: String,
}

fn default_http_port() -> u16 {
    8080
}

fn default_list_page_cap() -> u32 {
    500
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Path to the `SQLite` database file.
    pub db_path: PathBuf,
    /// HTTP port for the API surface.
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Maximum number of messages returned by a single list call.
    #[serde(default = "default_list_page_cap")]
    pub list_page_cap: u32,
    /// Notification delivery settings.
    #[serde(default)]
    pub notify: NotifyConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Populate the webhook bearer token from `COURIER_WEBHOOK_TOKEN`.
    ///
    /// Missing env var is not an error; the webhook is then called without
    /// an Authorization header.
    pub fn load_credentials(&mut self) {
        if let Ok(token) = std::env::var("COURIER_WEBHOOK_TOKEN") {
            self.notify.webhook_token = token;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.db_path.as_os_str().is_empty() {
            return Err(AppError::Config("db_path must not be empty".into()));
        }

        if self.list_page_cap == 0 {
            return Err(AppError::Config(
                "list_page_cap must be greater than zero".into(),
            ));
        }

        if !self.notify.webhook_url.is_empty()
            && !self.notify.webhook_url.starts_with("http://")
            && !self.notify.webhook_url.starts_with("https://")
        {
            return Err(AppError::Config(
                "notify.webhook_url must be an http(s) URL".into(),
            ));
        }

        Ok(())
    }
}
