//! Registration, login and the current session

use crate::server::middleware::{AuthUser, client_info, login_key};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::services::{LoginRequest, RegisterRequest};
use crate::utils::error::DocflowError;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use tracing::{debug, warn};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register))
            .route("/login", web::post().to(login))
            .route("/me", web::get().to(me)),
    );
}

/// New accounts start pending until an admin validates them
async fn register(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    debug!("Registration requested");

    let client = client_info(&req);
    let user = state.users.register(request.into_inner(), &client).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(user)))
}

async fn login(
    state: web::Data<AppState>,
    req: HttpRequest,
    request: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let key = login_key(client.ip_address.as_deref(), &request.email);

    if let Err(retry_after) = state.login_limiter.check_allowed(&key) {
        return Err(DocflowError::rate_limit(format!(
            "Too many failed login attempts, retry in {} seconds",
            retry_after
        ))
        .into());
    }

    match state.users.login(request.into_inner(), &client).await {
        Ok(response) => {
            state.login_limiter.record_success(&key);
            Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
        }
        Err(e @ DocflowError::Unauthorized(_)) => {
            if let Some(lockout) = state.login_limiter.record_failure(&key) {
                warn!(
                    ip = ?client.ip_address,
                    lockout_secs = lockout,
                    "Login locked out after repeated failures"
                );
            }
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn me(user: AuthUser) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(user.into_inner())))
}
