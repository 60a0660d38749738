//! Configuration module for the interview-prep backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;

use crate::errors::AppError;

/// Default pool size for the SQLite store.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite connection string; data endpoints fail when absent
    pub database_url: Option<String>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Maximum pooled connections
    pub db_max_connections: u32,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let bind_addr = env::var("PREP_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Configuration(format!("Invalid PREP_BIND_ADDR: {}", e)))?;

        let log_level = env::var("PREP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let db_max_connections = match env::var("PREP_DB_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse().map_err(|e| {
                AppError::Configuration(format!("Invalid PREP_DB_MAX_CONNECTIONS: {}", e))
            })?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            log_level,
            db_max_connections,
        })
    }
}
