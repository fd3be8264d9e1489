use serde::{Deserialize, Serialize};
use std::env;

/// Hosted fallback used when no backend URL is configured.
pub const DEFAULT_BACKEND_URL: &str = "https://saferemediate-backend.onrender.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub dir: String,
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        // Load .env.local first (local overrides), then .env
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
                environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            },
            backend: BackendConfig {
                base_url: env::var("BACKEND_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string()),
                timeout_secs: env::var("BACKEND_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            },
            cache: CacheConfig {
                dir: env::var("FLOW_CACHE_DIR").unwrap_or_else(|_| "./cache/flows".to_string()),
                ttl_secs: env::var("FLOW_CACHE_TTL_SECS")
                    .unwrap_or_else(|_| "300".to_string())
                    .parse()
                    .unwrap_or(300),
            },
            logging: LoggingConfig {
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            },
        })
    }
}
