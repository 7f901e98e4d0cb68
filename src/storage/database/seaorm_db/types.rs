use crate::utils::error::DocflowError;
use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use serde::Serialize;

/// SeaORM-based database implementation
#[derive(Debug)]
pub struct SeaOrmDatabase {
    pub(super) db: DatabaseConnection,
    /// Backend type indicator
    pub(super) backend_type: DatabaseBackendType,
}

/// Database backend type indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackendType {
    PostgreSQL,
    SQLite,
}

/// One page of a listing plus the unpaged total
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Map a unique-index violation to `Conflict`, anything else to `Database`
pub(super) fn unique_violation_as_conflict(err: DbErr, message: &str) -> DocflowError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DocflowError::conflict(message),
        _ => DocflowError::Database(err),
    }
}

/// Clamp 1-based paging input to sane values, returning a 0-based page index
pub(super) fn page_index(page: u64, limit: u64) -> (u64, u64) {
    (page.max(1) - 1, limit.clamp(1, 100))
}
