//! Invitation lifecycle endpoints

use crate::core::models::{Document, Invitation};
use crate::server::middleware::{AuthUser, client_info};
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::services::{AcceptInvitationRequest, CreateInvitationRequest, DeclineInvitationRequest};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invitations")
            .service(
                web::resource("")
                    .route(web::get().to(list_my_invitations))
                    .route(web::post().to(create_invitation)),
            )
            .route("/{invitation_id}/accept", web::put().to(accept_invitation))
            .route("/{invitation_id}/decline", web::put().to(decline_invitation))
            .route("/{invitation_id}/resend", web::post().to(resend_invitation))
            .route("/{invitation_id}/cancel", web::delete().to(cancel_invitation)),
    );
}

/// Acceptance links carry the token in the query string
#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AcceptedInvitation {
    pub invitation: Invitation,
    pub document: Document,
}

async fn create_invitation(
    state: web::Data<AppState>,
    user: AuthUser,
    req: HttpRequest,
    request: web::Json<CreateInvitationRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let invitation = state
        .invitations
        .create(&user, request.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(invitation)))
}

/// Invitations addressed to the caller's email
async fn list_my_invitations(
    state: web::Data<AppState>,
    user: AuthUser,
) -> ActixResult<HttpResponse> {
    let invitations = state.invitations.list_mine(&user).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(invitations)))
}

async fn accept_invitation(
    state: web::Data<AppState>,
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<Uuid>,
    query: web::Query<TokenQuery>,
    request: Option<web::Json<AcceptInvitationRequest>>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let mut request = request.map(web::Json::into_inner).unwrap_or_default();
    if request.token.is_none() {
        request.token = query.into_inner().token;
    }

    let (invitation, document) = state
        .invitations
        .accept(&user, path.into_inner(), request, &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(AcceptedInvitation {
        invitation,
        document,
    })))
}

async fn decline_invitation(
    state: web::Data<AppState>,
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<Uuid>,
    request: Option<web::Json<DeclineInvitationRequest>>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let invitation = state
        .invitations
        .decline(&user, path.into_inner(), request, &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(invitation)))
}

async fn resend_invitation(
    state: web::Data<AppState>,
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let invitation = state
        .invitations
        .resend(&user, path.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(invitation)))
}

async fn cancel_invitation(
    state: web::Data<AppState>,
    user: AuthUser,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let invitation = state
        .invitations
        .cancel(&user, path.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(invitation)))
}
