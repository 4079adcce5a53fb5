//! Application configuration
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Frontend assets directory
    pub frontend_dir: String,
    /// Session expiration in hours
    pub session_expiry_hours: i64,
    /// Maximum request body size in bytes (photos travel base64-inline)
    pub max_body_size: usize,
    /// CORS allowed origins
    pub cors_origins: Vec<String>,
    /// Environment (development/production)
    pub environment: Environment,
    /// Artificial latency of the in-memory record store, in milliseconds
    pub store_latency_ms: u64,
    /// Optional Postgres URL enabling the partial case archive
    pub database_url: Option<String>,
    /// Optional summarization API key; absent disables the feature
    pub summary_api_key: Option<String>,
    /// Override for the summarization endpoint
    pub summary_api_url: Option<String>,
    /// Seed the demo accounts at startup
    pub seed_demo_accounts: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Development,
    Production,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = match env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        };

        let store_latency_ms = match env::var("STORE_LATENCY_MS") {
            Err(_) => 500,
            Ok(raw) => raw.parse().map_err(|_| {
                ConfigError::Invalid(format!(
                    "STORE_LATENCY_MS must be a number of milliseconds, got '{}'",
                    raw
                ))
            })?,
        };

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            frontend_dir: env::var("FRONTEND_DIR").unwrap_or_else(|_| "./frontend".to_string()),
            session_expiry_hours: env::var("SESSION_EXPIRY_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(8),
            max_body_size: env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(50 * 1024 * 1024), // 50MB default
            cors_origins: env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|o| o.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["http://localhost:8080".to_string()]),
            environment,
            store_latency_ms,
            database_url: env::var("DATABASE_URL").ok().filter(|v| !v.is_empty()),
            summary_api_key: env::var("SUMMARY_API_KEY").ok().filter(|v| !v.is_empty()),
            summary_api_url: env::var("SUMMARY_API_URL").ok().filter(|v| !v.is_empty()),
            seed_demo_accounts: env::var("SEED_DEMO_ACCOUNTS")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Get the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
