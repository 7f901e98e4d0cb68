//! Top-level application configuration

use super::*;
use crate::utils::error::{DocflowError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Application configuration, one section per concern
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub collaboration: CollaborationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Build a configuration from `DOCFLOW_*` environment variables on top of defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(host) = env::var("DOCFLOW_HOST") {
            config.server.host = host;
        }
        if let Some(port) = parse_env::<u16>("DOCFLOW_PORT")? {
            config.server.port = port;
        }
        if let Some(workers) = parse_env::<usize>("DOCFLOW_WORKERS")? {
            config.server.workers = Some(workers);
        }
        if let Ok(secret) = env::var("DOCFLOW_JWT_SECRET") {
            config.auth.jwt_secret = secret;
        }
        if let Some(expiration) = parse_env::<u64>("DOCFLOW_JWT_EXPIRATION")? {
            config.auth.jwt_expiration = expiration;
        }
        if let Ok(url) = env::var("DOCFLOW_DATABASE_URL") {
            config.storage.database.url = url;
        }
        if let Some(ttl) = parse_env::<i64>("DOCFLOW_INVITATION_TTL_DAYS")? {
            config.collaboration.invitation_ttl_days = ttl;
        }
        if let Some(strict) = parse_env::<bool>("DOCFLOW_REQUIRE_AUTHORS_TO_PUBLISH")? {
            config.collaboration.require_authors_to_publish = strict;
        }
        if let Ok(base_url) = env::var("DOCFLOW_APP_BASE_URL") {
            config.collaboration.app_base_url = base_url;
        }
        if let Ok(level) = env::var("DOCFLOW_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = parse_env::<bool>("DOCFLOW_LOG_JSON")? {
            config.logging.json = json;
        }

        Ok(config)
    }
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| DocflowError::config(format!("Invalid value for {}: {}", name, raw))),
        Err(_) => Ok(None),
    }
}
