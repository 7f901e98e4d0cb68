//! Bearer authentication
//!
//! The middleware resolves the bearer token to a user allowed to log in and
//! stores it in the request extensions; handlers take it as [`AuthUser`].

use super::helpers::{extract_bearer_token, is_public_route, reject};
use crate::core::models::User;
use crate::server::state::AppState;
use crate::utils::error::DocflowError;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, warn};

/// The authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn into_inner(self) -> User {
        self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| DocflowError::unauthorized("Authentication required").into()),
        )
    }
}

/// Authentication middleware for Actix-web
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for authentication middleware
pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

async fn authenticate(req: &ServiceRequest) -> Result<User, DocflowError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| DocflowError::internal("App state not found"))?;
    let token = extract_bearer_token(req.headers())
        .ok_or_else(|| DocflowError::unauthorized("Missing bearer token"))?;

    match state.users.authenticate(token).await {
        Ok(user) => Ok(user),
        Err(e) if e.is_store_failure() => Err(e),
        Err(e) => {
            warn!("Authentication failed for {}: {}", req.path(), e);
            Err(DocflowError::unauthorized("Invalid or expired token"))
        }
    }
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
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
            if is_public_route(req.path()) {
                debug!("Skipping authentication for public route: {}", req.path());
                return service
                    .call(req)
                    .await
                    .map(ServiceResponse::map_into_left_body);
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!("Authenticated {} for {}", user.id(), req.path());
                    req.extensions_mut().insert(AuthUser(user));
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
