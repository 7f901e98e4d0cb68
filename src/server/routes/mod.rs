//! HTTP route modules
//!
//! Handlers stay thin: they pull typed values out of the request (the
//! authenticated user, the gated document, JSON bodies) and call into the
//! services held by [`AppState`](crate::server::state::AppState).

pub mod activity;
pub mod auth;
pub mod documents;
pub mod health;
pub mod invitations;
pub mod users;

use crate::server::middleware::AuthMiddleware;
use crate::storage::Page;
use crate::utils::error::{DocflowError, Result};
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};

/// Largest page a list endpoint will return
pub const MAX_PAGE_SIZE: u64 = 100;

/// Register every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes).service(
        web::scope("/api/v1")
            .wrap(AuthMiddleware)
            .configure(auth::configure_routes)
            .configure(users::configure_routes)
            .configure(documents::configure_routes)
            .configure(invitations::configure_routes)
            .configure(activity::configure_routes),
    );
}

/// Standard API response structure
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
            meta: None,
        }
    }

    pub fn success_with_meta(data: T, meta: PaginationMeta) -> Self {
        Self {
            success: true,
            data,
            meta: Some(meta),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit) };

        Self {
            page,
            limit,
            total,
            pages,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

/// Query parameters for pagination
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    1
}

fn default_limit() -> u64 {
    20
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageQuery {
    pub fn validate(&self) -> Result<()> {
        if self.page == 0 {
            return Err(DocflowError::validation("Page must be greater than 0"));
        }
        if self.limit == 0 {
            return Err(DocflowError::validation("Limit must be greater than 0"));
        }
        if self.limit > MAX_PAGE_SIZE {
            return Err(DocflowError::validation(format!(
                "Limit cannot exceed {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }
}

/// 200 with the page items and pagination metadata
pub fn paginated<T: Serialize>(page: Page<T>, query: &PageQuery) -> HttpResponse {
    let meta = PaginationMeta::new(query.page, query.limit, page.total);
    HttpResponse::Ok().json(ApiResponse::success_with_meta(page.items, meta))
}
