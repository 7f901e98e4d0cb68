//! Authentication configuration

use super::*;
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// JWT secret
    pub jwt_secret: String,
    /// JWT expiration in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: u64,
    /// JWT issuer and audience
    #[serde(default = "default_jwt_issuer")]
    pub issuer: String,
    /// Brute-force protection for the login endpoint
    #[serde(default)]
    pub login_rate_limit: LoginRateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: generate_secure_jwt_secret(),
            jwt_expiration: default_jwt_expiration(),
            issuer: default_jwt_issuer(),
            login_rate_limit: LoginRateLimitConfig::default(),
        }
    }
}

/// Login lockout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRateLimitConfig {
    /// Failed attempts tolerated inside the window
    #[serde(default = "default_max_failures")]
    pub max_failures: u32,
    /// Window in which failures are counted, in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
    /// Base lockout once the limit is hit, in seconds (doubles on repeat)
    #[serde(default = "default_lockout_secs")]
    pub lockout_secs: u64,
}

impl Default for LoginRateLimitConfig {
    fn default() -> Self {
        Self {
            max_failures: default_max_failures(),
            window_secs: default_window_secs(),
            lockout_secs: default_lockout_secs(),
        }
    }
}

fn default_max_failures() -> u32 {
    5
}

fn default_window_secs() -> u64 {
    300
}

fn default_lockout_secs() -> u64 {
    60
}

/// Generate a secure random JWT secret
fn generate_secure_jwt_secret() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
