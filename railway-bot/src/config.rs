//! Process configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

use crate::railway::RailwayConfig;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid BOT_BIND_ADDR {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid RAILWAY_TIMEOUT_SECS {0:?}")]
    InvalidTimeout(String),
}

/// Everything `main` needs to start the bot.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// XSRF token for the railway API. Empty if unset; lookups will then be
    /// refused upstream.
    pub api_token: String,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
    /// `Accept-Language` for lookups; the API localises train brands.
    pub language: Option<String>,
    /// Serve lookups from fixture files in this directory instead of the
    /// live API.
    pub mock_dir: Option<PathBuf>,
    pub bind_addr: SocketAddr,
}

impl BotConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to
    /// its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mock_dir = get("RAILWAY_MOCK_DIR").map(PathBuf::from);

        let api_token = get("RAILWAY_API_TOKEN").unwrap_or_else(|| {
            if mock_dir.is_none() {
                warn!("RAILWAY_API_TOKEN not set; availability lookups will fail");
            }
            String::new()
        });

        let timeout_secs = get("RAILWAY_TIMEOUT_SECS")
            .map(|v| v.trim().parse().map_err(|_| ConfigError::InvalidTimeout(v)))
            .transpose()?;

        let bind = get("BOT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidBindAddr {
                value: bind.clone(),
                source,
            })?;

        Ok(Self {
            api_token,
            base_url: get("RAILWAY_BASE_URL"),
            timeout_secs,
            language: get("RAILWAY_LANGUAGE").map(|v| v.trim().to_string()),
            mock_dir,
            bind_addr,
        })
    }

    /// Client settings for the live API.
    pub fn railway(&self) -> RailwayConfig {
        let mut config = RailwayConfig::new(&self.api_token);
        if let Some(url) = &self.base_url {
            config = config.with_base_url(url);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(secs);
        }
        if let Some(language) = &self.language {
            config = config.with_language(language);
        }
        config
    }
}
