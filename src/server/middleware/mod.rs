//! HTTP middleware implementations
//!
//! - Request ID tracking
//! - Bearer authentication
//! - The per-document access gate
//! - Login brute-force protection

mod auth;
mod auth_rate_limiter;
mod document_access;
mod helpers;
mod request_id;


pub use auth::{AuthMiddleware, AuthMiddlewareService, AuthUser};
pub use auth_rate_limiter::{AuthRateLimiter, login_key};
pub use document_access::{
    DocumentAccess, DocumentAccessMiddleware, DocumentAccessMiddlewareService, parse_document_id,
};
pub use helpers::{client_info, extract_bearer_token, is_public_route, required_level};
pub use request_id::{REQUEST_ID_HEADER, RequestId, RequestIdMiddleware, RequestIdMiddlewareService};
