//! Utility modules for docflow
//!
//! - **error**: the crate-wide error type and its HTTP rendering
//! - **logging**: tracing subscriber setup and payload redaction

pub mod error;
pub mod logging;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

static EMAIL_REGEX: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Generate a unique request ID
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Check if a string is a syntactically valid email
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_REGEX
        .as_ref()
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

/// Lowercase and trim an email for comparison and storage
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Check if a string is a valid URL
pub fn is_valid_url(url: &str) -> bool {
    url::Url::parse(url).is_ok()
}
