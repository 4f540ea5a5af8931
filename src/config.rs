//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use crate::catalog::EvaluationPolicy;
use serde::Deserialize;
use std::net::Ipv4Addr;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
    /// Upper bound on request bodies, mostly catalog loads
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0), // Bind to 0.0.0.0 for Docker
            port: 3000,
            max_body_bytes: 32 * 1024 * 1024,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub engine: EvaluationPolicy,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, falling back to defaults for
    /// unset keys
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let server = ServerConfig {
            host: parse_or(&lookup, "HOST", defaults.server.host)?,
            port: parse_or(&lookup, "PORT", defaults.server.port)?,
            max_body_bytes: parse_or(&lookup, "MAX_BODY_BYTES", defaults.server.max_body_bytes)?,
        };

        let cors = CorsConfig {
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|s| split_list(&s))
                .unwrap_or(defaults.cors.allowed_origins),
        };

        let max_traversal_depth = parse_or(&lookup, "MAX_TRAVERSAL_DEPTH", defaults.engine.max_traversal_depth)?;
        if max_traversal_depth == 0 {
            return Err(ConfigError::InvalidValue(
                "MAX_TRAVERSAL_DEPTH must be at least 1".to_string(),
            ));
        }

        let engine = EvaluationPolicy {
            pii_markers: lookup("PII_MARKERS")
                .map(|s| split_list(&s))
                .unwrap_or(defaults.engine.pii_markers),
            max_traversal_depth,
        };

        Ok(Self { server, cors, engine })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(format!("{key}={raw}"))),
        None => Ok(default),
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
