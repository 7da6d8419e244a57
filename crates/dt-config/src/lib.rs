//! # dt-config
//!
//! Console settings, layered as: built-in defaults, then `.env`, then
//! `DITTO__*` environment variables (e.g. `DITTO__PAGE_SIZE=20`).

use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot load settings: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Remote REST API host
    pub api_base_url: String,
    /// Public site host, prefixed to report content paths
    pub web_base_url: String,
    pub bind_host: String,
    pub bind_port: u16,
    /// Where the auth token is persisted between restarts
    pub token_path: PathBuf,
    pub page_size: usize,
    pub detail_page_size: usize,
    pub request_timeout_secs: u64,
    /// Operator account that may not be suspended from the console
    pub protected_user_id: Option<i64>,
    /// Extra origin allowed to read pages and post forms, e.g. when the
    /// console sits behind a proxy under another host name
    #[serde(default)]
    pub trusted_origin: Option<String>,
}

impl Settings {
    /// Reads `.env` (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }
        let env = Environment::with_prefix("DITTO").separator("__").try_parsing(true);
        Self::from_builder(Self::defaults()?.add_source(env))
    }

    /// Defaults only; the starting point for `load` and for tests.
    pub fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("api_base_url", "https://dittotrip.site")?
            .set_default("web_base_url", "https://dittotrip.site")?
            .set_default("bind_host", "127.0.0.1")?
            .set_default("bind_port", 8080)?
            .set_default("token_path", "./data/token")?
            .set_default("page_size", 10)?
            .set_default("detail_page_size", 3)?
            .set_default("request_timeout_secs", 30)?
            .set_default("protected_user_id", 200)?)
    }

    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.bind_host.clone(), self.bind_port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid { key: "page_size", reason: "must be at least 1".into() });
        }
        if self.detail_page_size == 0 {
            return Err(ConfigError::Invalid { key: "detail_page_size", reason: "must be at least 1".into() });
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                key: "api_base_url",
                reason: format!("{:?} is not an http(s) URL", self.api_base_url),
            });
        }
        if let Some(origin) = &self.trusted_origin {
            if !origin.starts_with("http://") && !origin.starts_with("https://") {
                return Err(ConfigError::Invalid {
                    key: "trusted_origin",
                    reason: format!("{origin:?} is not an http(s) origin"),
                });
            }
        }
        Ok(())
    }
}
