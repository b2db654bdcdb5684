use std::env;
use std::time::Duration;

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Redis,
    Document,
    Memory,
}

impl StoreBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "redis" => Some(Self::Redis),
            "document" | "firebase" => Some(Self::Document),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub store_backend: StoreBackend,
    pub redis_url: Option<String>,
    pub document_store_url: Option<String>,
    pub document_store_auth: Option<String>,
    pub default_key: String,
    pub bot_filter: bool,
    pub throttle: bool,
    pub throttle_secs: u64,
    pub unique_ttl_secs: u64,
    pub infer_key_from_path: bool,
    pub client_ip_header: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown STORE_BACKEND: {0}")]
    UnknownBackend(String),
    #[error("{0} must be set for the selected store backend")]
    Missing(&'static str),
    #[error("invalid store configuration: {0}")]
    InvalidStore(String),
}

/// 与未设置任何环境变量时 `from_env` 的取值一致（`from_env` 还要求 `REDIS_URL`）
impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8787,
            store_backend: StoreBackend::Redis,
            redis_url: None,
            document_store_url: None,
            document_store_auth: None,
            default_key: "home".to_string(),
            bot_filter: true,
            throttle: true,
            throttle_secs: 3,
            unique_ttl_secs: 86400,
            infer_key_from_path: true,
            client_ip_header: "cf-connecting-ip".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let defaults = Config::default();

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(raw) => StoreBackend::parse(&raw).ok_or(ConfigError::UnknownBackend(raw))?,
            Err(_) => defaults.store_backend,
        };

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: env_parse("SERVER_PORT", defaults.server_port),
            store_backend,
            redis_url: env_opt("REDIS_URL"),
            document_store_url: env_opt("DOCUMENT_STORE_URL"),
            document_store_auth: env_opt("DOCUMENT_STORE_AUTH"),
            default_key: env_opt("DEFAULT_KEY").unwrap_or(defaults.default_key),
            bot_filter: env_flag("BOT_FILTER", defaults.bot_filter),
            throttle: env_flag("THROTTLE", defaults.throttle),
            throttle_secs: env_parse("THROTTLE_SECS", defaults.throttle_secs),
            unique_ttl_secs: env_parse("UNIQUE_TTL_SECS", defaults.unique_ttl_secs),
            infer_key_from_path: env_flag("INFER_KEY_FROM_PATH", defaults.infer_key_from_path),
            client_ip_header: env_opt("CLIENT_IP_HEADER")
                .map(|h| h.to_ascii_lowercase())
                .unwrap_or(defaults.client_ip_header),
        };

        match config.store_backend {
            StoreBackend::Redis if config.redis_url.is_none() => {
                Err(ConfigError::Missing("REDIS_URL"))
            }
            StoreBackend::Document if config.document_store_url.is_none() => {
                Err(ConfigError::Missing("DOCUMENT_STORE_URL"))
            }
            _ => Ok(config),
        }
    }

    pub fn throttle_window(&self) -> Duration {
        Duration::from_secs(self.throttle_secs)
    }

    pub fn unique_ttl(&self) -> Duration {
        Duration::from_secs(self.unique_ttl_secs)
    }
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env_opt(name)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_flag(name: &str, default: bool) -> bool {
    match env_opt(name).map(|v| v.to_ascii_lowercase()) {
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => true,
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => false,
        _ => default,
    }
}
