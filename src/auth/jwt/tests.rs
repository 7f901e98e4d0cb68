//! JWT module tests

use super::types::{Claims, JwtHandler};
use crate::config::AuthConfig;
use crate::core::models::UserRole;
use crate::utils::error::DocflowError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

fn create_test_handler() -> JwtHandler {
    let config = AuthConfig {
        jwt_secret: "Test-Secret-Key-For-Unit-Tests-Only-0123".to_string(),
        jwt_expiration: 3600,
        issuer: "docflow-test".to_string(),
        ..AuthConfig::default()
    };

    JwtHandler::new(&config)
}

#[test]
fn test_create_and_verify_access_token() {
    let handler = create_test_handler();
    let user_id = Uuid::new_v4();

    let token = handler
        .create_access_token(user_id, UserRole::Manager)
        .unwrap();
    assert_eq!(token.token_type, "Bearer");
    assert_eq!(token.expires_in, 3600);

    let claims = handler.verify_token(&token.access_token).unwrap();
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.role, "manager");
    assert_eq!(claims.iss, "docflow-test");
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_claims_carry_registered_fields_and_role() {
    let handler = create_test_handler();
    let token = handler
        .create_access_token(Uuid::new_v4(), UserRole::User)
        .unwrap();

    let mut validation = Validation::default();
    validation.set_audience(&["docflow-test"]);
    let raw = decode::<serde_json::Value>(
        &token.access_token,
        &DecodingKey::from_secret(b"Test-Secret-Key-For-Unit-Tests-Only-0123"),
        &validation,
    )
    .unwrap()
    .claims;

    let mut keys: Vec<&str> = raw
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(keys, ["aud", "exp", "iat", "iss", "jti", "role", "sub"]);
}

#[test]
fn test_tokens_have_unique_ids() {
    let handler = create_test_handler();
    let user_id = Uuid::new_v4();

    let first = handler.create_access_token(user_id, UserRole::User).unwrap();
    let second = handler.create_access_token(user_id, UserRole::User).unwrap();

    let first = handler.verify_token(&first.access_token).unwrap();
    let second = handler.verify_token(&second.access_token).unwrap();
    assert_ne!(first.jti, second.jti);
}

#[test]
fn test_invalid_token_rejected() {
    let handler = create_test_handler();
    let result = handler.verify_token("invalid.token.here");
    assert!(matches!(result, Err(DocflowError::Jwt(_))));
}

#[test]
fn test_token_from_other_secret_rejected() {
    let handler = create_test_handler();
    let other = JwtHandler::new(&AuthConfig {
        jwt_secret: "Another-Secret-Key-That-Does-Not-Match-99".to_string(),
        issuer: "docflow-test".to_string(),
        ..AuthConfig::default()
    });

    let token = other
        .create_access_token(Uuid::new_v4(), UserRole::Admin)
        .unwrap();
    assert!(handler.verify_token(&token.access_token).is_err());
}

#[test]
fn test_token_from_other_issuer_rejected() {
    let handler = create_test_handler();
    let other = JwtHandler::new(&AuthConfig {
        jwt_secret: "Test-Secret-Key-For-Unit-Tests-Only-0123".to_string(),
        issuer: "someone-else".to_string(),
        ..AuthConfig::default()
    });

    let token = other
        .create_access_token(Uuid::new_v4(), UserRole::User)
        .unwrap();
    assert!(handler.verify_token(&token.access_token).is_err());
}

#[test]
fn test_expired_token_rejected() {
    let handler = create_test_handler();
    let claims = Claims {
        sub: Uuid::new_v4(),
        iat: 1_000_000,
        exp: 1_000_060,
        iss: "docflow-test".to_string(),
        aud: "docflow-test".to_string(),
        jti: Uuid::new_v4().to_string(),
        role: "user".to_string(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"Test-Secret-Key-For-Unit-Tests-Only-0123"),
    )
    .unwrap();

    assert!(handler.verify_token(&token).is_err());
}

#[test]
fn test_extract_token_from_header() {
    assert_eq!(
        JwtHandler::extract_token_from_header("Bearer abc.def.ghi"),
        Some("abc.def.ghi")
    );
    assert_eq!(JwtHandler::extract_token_from_header("Basic abc"), None);
    assert_eq!(JwtHandler::extract_token_from_header("Bearer "), None);
    assert_eq!(JwtHandler::extract_token_from_header(""), None);
}

#[test]
fn test_debug_redacts_keys() {
    let handler = create_test_handler();
    let debug = format!("{:?}", handler);
    assert!(debug.contains("[REDACTED]"));
    assert!(!debug.contains("Test-Secret-Key"));
}
