//! Document access gate
//!
//! Wraps the `/documents/{id}` scope. It parses the id, asks the access
//! service whether the authenticated caller holds the level the route needs
//! and hands the loaded document to the handler as [`DocumentAccess`].

use super::auth::AuthUser;
use super::helpers::{reject, required_level, service_client_info};
use crate::server::state::AppState;
use crate::services::AuthorizedDocument;
use crate::utils::error::DocflowError;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use uuid::Uuid;

/// Document the caller passed the gate for
#[derive(Debug, Clone)]
pub struct DocumentAccess(pub AuthorizedDocument);

impl DocumentAccess {
    pub fn into_inner(self) -> AuthorizedDocument {
        self.0
    }
}

impl std::ops::Deref for DocumentAccess {
    type Target = AuthorizedDocument;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for DocumentAccess {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<DocumentAccess>()
                .cloned()
                .ok_or_else(|| DocflowError::internal("Document access gate not applied").into()),
        )
    }
}

/// Parse the `{id}` path segment
pub fn parse_document_id(raw: Option<&str>) -> Result<Uuid, DocflowError> {
    raw.and_then(|id| Uuid::parse_str(id).ok())
        .ok_or_else(|| DocflowError::validation("Invalid document id"))
}

pub struct DocumentAccessMiddleware;

impl<S, B> Transform<S, ServiceRequest> for DocumentAccessMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = DocumentAccessMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DocumentAccessMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct DocumentAccessMiddlewareService<S> {
    service: Rc<S>,
}

async fn authorize(req: &ServiceRequest) -> Result<AuthorizedDocument, DocflowError> {
    let document_id = parse_document_id(req.match_info().get("id"))?;
    let user = req
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| DocflowError::unauthorized("Authentication required"))?;
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| DocflowError::internal("App state not found"))?;

    let level = required_level(req.method(), req.path());
    let client = service_client_info(req);
    state
        .access
        .authorize(user.user(), document_id, level, &client)
        .await
}

impl<S, B> Service<ServiceRequest> for DocumentAccessMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            match authorize(&req).await {
                Ok(authorized) => {
                    req.extensions_mut().insert(DocumentAccess(authorized));
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Err(e) => Ok(reject(req, e).map_into_right_body()),
            }
        })
    }
}
