//! Health check endpoint

use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::storage::StorageHealthStatus;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, warn};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}

/// Health status response
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: Cow<'static, str>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: Cow<'static, str>,
    pub storage: StorageHealthStatus,
}

/// Liveness plus a database ping.
///
/// Answers 503 when the database cannot be reached so load balancers stop
/// routing to this instance.
pub async fn health_check(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    debug!("Health check requested");

    let storage = state.storage.health_check().await;
    let healthy = storage.overall;
    let status = HealthStatus {
        status: Cow::Borrowed(if healthy { "healthy" } else { "degraded" }),
        timestamp: chrono::Utc::now(),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        storage,
    };

    if healthy {
        Ok(HttpResponse::Ok().json(ApiResponse::success(status)))
    } else {
        warn!("Health check reports degraded storage");
        Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::success(status)))
    }
}
