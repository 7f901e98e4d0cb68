//! Activity trail

use crate::server::middleware::AuthUser;
use crate::server::routes::{PageQuery, paginated};
use crate::server::state::AppState;
use crate::utils::error::DocflowError;
use actix_web::{HttpResponse, Result as ActixResult, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/activity")
            .route("", web::get().to(list_all_activity))
            .route("/me", web::get().to(list_my_activity)),
    );
}

async fn list_my_activity(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> ActixResult<HttpResponse> {
    query.validate()?;
    let page = state
        .activity
        .list_for_actor(user.id(), query.page, query.limit)
        .await?;
    Ok(paginated(page, &query))
}

/// Admin only
async fn list_all_activity(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> ActixResult<HttpResponse> {
    if !user.is_admin() {
        return Err(DocflowError::forbidden("admin_required").into());
    }
    query.validate()?;
    let page = state.activity.list_all(query.page, query.limit).await?;
    Ok(paginated(page, &query))
}
