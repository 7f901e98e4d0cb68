//! User administration

use crate::server::middleware::{AuthUser, client_info};
use crate::server::routes::{ApiResponse, PageQuery, paginated};
use crate::server::state::AppState;
use crate::services::{SetRoleRequest, ValidateUserRequest};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use uuid::Uuid;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::get().to(list_users))
            .route("/{user_id}/validate", web::put().to(validate_user))
            .route("/{user_id}/deactivate", web::put().to(deactivate_user))
            .route("/{user_id}/role", web::put().to(set_role)),
    );
}

async fn list_users(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> ActixResult<HttpResponse> {
    query.validate()?;
    let page = state.users.list(&user, query.page, query.limit).await?;
    Ok(paginated(page, &query))
}

async fn validate_user(
    state: web::Data<AppState>,
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<ValidateUserRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let updated = state
        .users
        .validate(&user, path.into_inner(), request.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

async fn deactivate_user(
    state: web::Data<AppState>,
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let updated = state
        .users
        .deactivate(&user, path.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}

async fn set_role(
    state: web::Data<AppState>,
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: web::Json<SetRoleRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let updated = state
        .users
        .set_role(&user, path.into_inner(), request.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(updated)))
}
