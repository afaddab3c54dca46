//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use crate::services::ServiceKind;

/// Where a service keeps its records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Service this process runs
    pub service: ServiceKind,

    /// Database connection URL (absent for in-memory storage)
    pub database_url: Option<String>,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Path prefix every API route is mounted under
    pub context_path: String,

    /// Environment (development, production)
    pub environment: String,

    pub storage: StorageBackend,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env(service: ServiceKind) -> Result<Self, ConfigError> {
        Self::from_lookup(service, |key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(service: ServiceKind, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let storage = match lookup("STORAGE").as_deref() {
            None | Some("postgres") => StorageBackend::Postgres,
            Some("memory") => StorageBackend::Memory,
            Some(_) => return Err(ConfigError::InvalidValue("STORAGE")),
        };

        let database_url = lookup("DATABASE_URL");
        if storage == StorageBackend::Postgres && database_url.is_none() {
            return Err(ConfigError::MissingEnv("DATABASE_URL"));
        }

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .map_err(|_| ConfigError::InvalidValue("PORT"))?,
            None => service.default_port(),
        };

        let context_path = normalize_context_path(
            &lookup("CONTEXT_PATH").unwrap_or_else(|| service.default_context_path().to_string()),
        )?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        Ok(Self {
            service,
            database_url,
            database_max_connections,
            host,
            port,
            context_path,
            environment,
            storage,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Normalize a context path to `/segment...` without a trailing slash.
/// The root path becomes the empty string.
fn normalize_context_path(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') || trimmed.contains(char::is_whitespace) {
        return Err(ConfigError::InvalidValue("CONTEXT_PATH"));
    }
    Ok(trimmed.to_string())
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
