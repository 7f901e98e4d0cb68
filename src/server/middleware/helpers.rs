//! Helper functions for middleware and handlers

use super::request_id::RequestId;
use crate::core::models::PermissionLevel;
use crate::services::ClientInfo;
use crate::utils::error::DocflowError;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::{HttpMessage, HttpRequest};
use actix_web::http::Method;
use actix_web::http::header::{HeaderMap, USER_AGENT};

/// Routes reachable without a bearer token
pub fn is_public_route(path: &str) -> bool {
    const PUBLIC_ROUTES: &[&str] = &["/health", "/api/v1/auth/login", "/api/v1/auth/register"];

    PUBLIC_ROUTES
        .iter()
        .any(|&route| path == route || path.starts_with(&format!("{}/", route)))
}

/// Bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(crate::auth::JwtHandler::extract_token_from_header)
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
}

/// Caller address and agent, recorded with activity and signatures
pub fn client_info(req: &HttpRequest) -> ClientInfo {
    ClientInfo {
        ip_address: req.connection_info().realip_remote_addr().map(|s| s.to_string()),
        user_agent: user_agent(req.headers()),
    }
}

pub(crate) fn service_client_info(req: &ServiceRequest) -> ClientInfo {
    ClientInfo {
        ip_address: req.connection_info().realip_remote_addr().map(|s| s.to_string()),
        user_agent: user_agent(req.headers()),
    }
}

/// Answer the request with `err`, stamped with the request id
pub(crate) fn reject(req: ServiceRequest, err: DocflowError) -> ServiceResponse {
    let request_id = req.extensions().get::<RequestId>().map(|id| id.0.clone());
    let response = err.to_response_with_request_id(request_id);
    req.into_response(response)
}

/// Access level a request under `/documents/{id}` must hold.
///
/// Workflow and role checks that go beyond the level (draft-only edits,
/// manager-only delete, team-matched signing) happen in the services.
pub fn required_level(method: &Method, path: &str) -> PermissionLevel {
    let path = path.trim_end_matches('/');

    if path.contains("/permissions") {
        PermissionLevel::Admin
    } else if path.ends_with("/duplicate") {
        PermissionLevel::Read
    } else if path.ends_with("/signatures") && method == Method::POST {
        PermissionLevel::Sign
    } else if method == Method::GET || method == Method::HEAD {
        PermissionLevel::Read
    } else {
        PermissionLevel::Write
    }
}
