use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";
/// Largest page pump.fun serves from `/coins`.
pub const MAX_PAGE_SIZE: usize = 50;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub solana: SolanaConfig,
    pub gateway: GatewayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub site_url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub include_nsfw: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://frontend-api.pump.fun".to_string(),
            site_url: "https://pump.fun".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            timeout_secs: 10,
            include_nsfw: false,
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SolanaConfig {
    pub rpc_url: String,
}

impl Default for SolanaConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.mainnet-beta.solana.com".to_string(),
        }
    }
}

/// Sizes the gateway uses when talking to the upstream.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct GatewayConfig {
    /// Coins per upstream page, at most `MAX_PAGE_SIZE`.
    pub page_size: usize,
    pub default_token_limit: usize,
    pub max_token_limit: usize,
    pub trade_fetch_limit: usize,
    pub thread_fetch_limit: usize,
    pub search_limit: usize,
    /// Search pages scanned for an exact ticker match before giving up.
    pub search_pages: usize,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            default_token_limit: 100,
            max_token_limit: 1000,
            trade_fetch_limit: 200,
            thread_fetch_limit: 50,
            search_limit: 50,
            search_pages: 4,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .map_err(|e| Error::ConfigError(format!("Failed to read {}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }

    /// Loads the given file, or the default path when it exists, or built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::ConfigError(format!("Invalid PORT value: {}", port)))?;
        }
        if let Some(url) = lookup("PUMP_API_URL") {
            self.upstream.base_url = url;
        }
        if let Some(url) = lookup("SOLANA_RPC_URL") {
            self.solana.rpc_url = url;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(file) = lookup("LOG_FILE") {
            self.logging.file = Some(file);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.host.trim().is_empty() {
            return Err(Error::ConfigError("server.host cannot be empty".to_string()));
        }
        for (name, url) in [
            ("upstream.base_url", &self.upstream.base_url),
            ("upstream.site_url", &self.upstream.site_url),
            ("solana.rpc_url", &self.solana.rpc_url),
        ] {
            reqwest::Url::parse(url)
                .map_err(|e| Error::ConfigError(format!("{} is not a valid URL ({}): {}", name, url, e)))?;
        }
        if self.upstream.timeout_secs == 0 {
            return Err(Error::ConfigError("upstream.timeout_secs must be positive".to_string()));
        }
        let gateway = &self.gateway;
        for (name, value) in [
            ("gateway.page_size", gateway.page_size),
            ("gateway.default_token_limit", gateway.default_token_limit),
            ("gateway.max_token_limit", gateway.max_token_limit),
            ("gateway.trade_fetch_limit", gateway.trade_fetch_limit),
            ("gateway.thread_fetch_limit", gateway.thread_fetch_limit),
            ("gateway.search_limit", gateway.search_limit),
            ("gateway.search_pages", gateway.search_pages),
        ] {
            if value == 0 {
                return Err(Error::ConfigError(format!("{} must be positive", name)));
            }
        }
        for (name, value) in [
            ("gateway.page_size", gateway.page_size),
            ("gateway.thread_fetch_limit", gateway.thread_fetch_limit),
            ("gateway.search_limit", gateway.search_limit),
        ] {
            if value > MAX_PAGE_SIZE {
                return Err(Error::ConfigError(format!(
                    "{} cannot exceed {} (pump.fun page size)",
                    name, MAX_PAGE_SIZE
                )));
            }
        }
        if gateway.default_token_limit > gateway.max_token_limit {
            return Err(Error::ConfigError(
                "gateway.default_token_limit exceeds gateway.max_token_limit".to_string(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.to_socket_addrs()
            .map_err(|e| Error::ConfigError(format!("Cannot resolve {}: {}", addr, e)))?
            .next()
            .ok_or_else(|| Error::ConfigError(format!("No address found for {}", addr)))
    }
}
