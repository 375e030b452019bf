//! Board configuration.
//!
//! Loaded from a JSON document ([`BoardConfig::from_json_str`]) or from the environment
//! ([`BoardConfig::from_env`]). Either way the result is validated before use.

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

pub const ENV_API_URL: &str = "ORDER_BOARD_API_URL";
pub const ENV_SOCKET_URL: &str = "ORDER_BOARD_SOCKET_URL";
pub const ENV_PAGE_SIZE: &str = "ORDER_BOARD_PAGE_SIZE";
pub const ENV_TOKEN: &str = "ORDER_BOARD_TOKEN";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Config parse failed: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Base URL of the order API, e.g. `https://api.example.com/api`.
    pub api_url: String,
    /// WebSocket URL of the push channel. Without it the board only updates on fetches.
    #[serde(default)]
    pub socket_url: Option<String>,
    #[serde(default = "default_orders_path")]
    pub orders_path: String,
    #[serde(default = "default_order_path")]
    pub order_path: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Capacity of the board actor's mailbox and of the push frame channel.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Bearer token. Never serialized back out.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

fn default_orders_path() -> String {
    "/orders".to_string()
}

fn default_order_path() -> String {
    "/order/get/one".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_channel_buffer() -> usize {
    64
}

fn default_request_timeout_secs() -> u64 {
    15
}

impl BoardConfig {
    /// A config with defaults for everything but the API URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            socket_url: None,
            orders_path: default_orders_path(),
            order_path: default_order_path(),
            page_size: default_page_size(),
            channel_buffer: default_channel_buffer(),
            request_timeout_secs: default_request_timeout_secs(),
            token: None,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: BoardConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup(ENV_API_URL).ok_or(ConfigError::Missing(ENV_API_URL))?;
        let mut config = Self::new(api_url);
        config.socket_url = lookup(ENV_SOCKET_URL).filter(|s| !s.is_empty());
        config.token = lookup(ENV_TOKEN).filter(|s| !s.is_empty());
        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            config.page_size = raw.parse().map_err(|e: std::num::ParseIntError| ConfigError::Invalid {
                field: ENV_PAGE_SIZE,
                reason: e.to_string(),
            })?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "api_url",
                reason: "must not be empty".into(),
            });
        }
        if self.socket_url.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(ConfigError::Invalid {
                field: "socket_url",
                reason: "must not be empty".into(),
            });
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid {
                field: "page_size",
                reason: "must be at least 1".into(),
            });
        }
        if self.channel_buffer == 0 {
            return Err(ConfigError::Invalid {
                field: "channel_buffer",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
