//! Configuration data models
//!
//! This module defines all configuration structures used by the service.

#![allow(missing_docs)]

pub mod app;
pub mod auth;
pub mod collaboration;
pub mod logging;
pub mod server;
pub mod storage;

pub use app::*;
pub use auth::*;
pub use collaboration::*;
pub use logging::*;
pub use server::*;
pub use storage::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8080
}

/// Default timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    2 * 1024 * 1024 // 2MB
}

pub fn default_database_url() -> String {
    "sqlite::memory:".to_string()
}

pub fn default_max_connections() -> u32 {
    10
}

pub fn default_connection_timeout() -> u64 {
    5
}

pub fn default_jwt_expiration() -> u64 {
    86400 // 24 hours
}

pub fn default_jwt_issuer() -> String {
    "docflow".to_string()
}

pub fn default_invitation_ttl_days() -> i64 {
    7
}

pub fn default_audit_deadline_ms() -> u64 {
    5000
}

pub fn default_outbox_capacity() -> usize {
    1024
}

pub fn default_app_base_url() -> String {
    "http://localhost:3000".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_true() -> bool {
    true
}
