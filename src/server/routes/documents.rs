//! Documents and their sub-resources
//!
//! Everything under `/documents/{id}` sits behind [`DocumentAccessMiddleware`],
//! so handlers there receive an already authorized document.

use crate::core::models::{Document, Signature};
use crate::server::middleware::{AuthUser, DocumentAccess, DocumentAccessMiddleware, client_info};
use crate::server::routes::{ApiResponse, PageQuery, paginated};
use crate::server::state::AppState;
use crate::services::{
    CreateDocumentRequest, DuplicateDocumentRequest, GrantPermissionRequest, SignDocumentRequest,
    UpdateDocumentRequest, UpdatePermissionRequest,
};
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/documents")
            .service(
                web::resource("")
                    .route(web::get().to(list_documents))
                    .route(web::post().to(create_document)),
            )
            .service(
                web::scope("/{id}")
                    .wrap(DocumentAccessMiddleware)
                    .service(
                        web::resource("")
                            .route(web::get().to(get_document))
                            .route(web::put().to(update_document))
                            .route(web::delete().to(delete_document)),
                    )
                    .route("/publish", web::post().to(publish_document))
                    .route("/advance", web::post().to(advance_document))
                    .route("/archive", web::post().to(archive_document))
                    .route("/duplicate", web::post().to(duplicate_document))
                    .service(
                        web::resource("/permissions")
                            .route(web::get().to(list_permissions))
                            .route(web::post().to(grant_permission)),
                    )
                    .service(
                        web::resource("/permissions/{user_id}")
                            .route(web::put().to(update_permission))
                            .route(web::delete().to(revoke_permission)),
                    )
                    .service(
                        web::resource("/signatures")
                            .route(web::get().to(list_signatures))
                            .route(web::post().to(sign_document)),
                    )
                    .route("/invitations", web::get().to(list_document_invitations)),
            ),
    );
}

#[derive(Debug, Deserialize)]
struct PermissionPath {
    user_id: Uuid,
}

/// Response to a successful signature
#[derive(Debug, Serialize)]
pub struct SignatureReceipt {
    pub signature: Signature,
    pub document: Document,
}

async fn list_documents(
    state: web::Data<AppState>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> ActixResult<HttpResponse> {
    query.validate()?;
    let page = state.documents.list(&user, query.page, query.limit).await?;
    Ok(paginated(page, &query))
}

async fn create_document(
    state: web::Data<AppState>,
    user: AuthUser,
    req: HttpRequest,
    request: web::Json<CreateDocumentRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let document = state
        .documents
        .create(&user, request.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(document)))
}

async fn get_document(access: DocumentAccess) -> ActixResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(access.into_inner().document)))
}

async fn update_document(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
    request: web::Json<UpdateDocumentRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let document = state
        .documents
        .update(&user, access.into_inner(), request.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(document)))
}

async fn delete_document(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    state
        .documents
        .delete(&user, access.into_inner().document, &client)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn publish_document(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let document = state
        .documents
        .publish(&user, access.into_inner().document, &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(document)))
}

async fn advance_document(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let document = state
        .documents
        .advance(&user, access.into_inner().document, &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(document)))
}

async fn archive_document(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let document = state
        .documents
        .archive(&user, access.into_inner().document, &client)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(document)))
}

/// The body is optional; without one contributors are not copied
async fn duplicate_document(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
    request: Option<web::Json<DuplicateDocumentRequest>>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let request = request.map(web::Json::into_inner).unwrap_or_default();
    let copy = state
        .documents
        .duplicate(&user, &access.document, request, &client)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(copy)))
}

async fn list_permissions(
    state: web::Data<AppState>,
    access: DocumentAccess,
) -> ActixResult<HttpResponse> {
    let permissions = state.permissions.list(&access.document).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(permissions)))
}

async fn grant_permission(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
    request: web::Json<GrantPermissionRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let (permission, created) = state
        .permissions
        .grant(&user, &access.document, request.into_inner(), &client)
        .await?;

    let body = ApiResponse::success(permission);
    if created {
        Ok(HttpResponse::Created().json(body))
    } else {
        Ok(HttpResponse::Ok().json(body))
    }
}

async fn update_permission(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
    path: web::Path<PermissionPath>,
    request: web::Json<UpdatePermissionRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let permission = state
        .permissions
        .update(
            &user,
            &access.document,
            path.user_id,
            request.into_inner(),
            &client,
        )
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(permission)))
}

async fn revoke_permission(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
    path: web::Path<PermissionPath>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    state
        .permissions
        .revoke(&user, &access.document, path.user_id, &client)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn list_signatures(
    state: web::Data<AppState>,
    access: DocumentAccess,
) -> ActixResult<HttpResponse> {
    let signatures = state.signatures.list(&access.document).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(signatures)))
}

async fn sign_document(
    state: web::Data<AppState>,
    user: AuthUser,
    access: DocumentAccess,
    req: HttpRequest,
    request: web::Json<SignDocumentRequest>,
) -> ActixResult<HttpResponse> {
    let client = client_info(&req);
    let (signature, document) = state
        .signatures
        .sign(&user, access.into_inner(), request.into_inner(), &client)
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(SignatureReceipt {
        signature,
        document,
    })))
}

async fn list_document_invitations(
    state: web::Data<AppState>,
    access: DocumentAccess,
) -> ActixResult<HttpResponse> {
    let invitations = state.invitations.list_for_document(&access.document).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(invitations)))
}
