//! Removal of secrets from structured payloads before they are persisted

use serde_json::Value;

const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "token",
    "secret",
    "key",
    "otp",
    "refresh_token",
    "refreshtoken",
    "access_token",
    "accesstoken",
];

/// Whether a field name looks like it carries a credential
pub fn is_sensitive_key(key: &str) -> bool {
    let key = key.to_lowercase();
    SENSITIVE_KEYS.iter().any(|sensitive| key.contains(sensitive))
}

/// Recursively drop sensitive fields from a JSON value
pub fn redact_sensitive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !is_sensitive_key(key));
            for nested in map.values_mut() {
                redact_sensitive(nested);
            }
        }
        Value::Array(items) => {
            for item in items {
                redact_sensitive(item);
            }
        }
        _ => {}
    }
}
