//! Storage layer
//!
//! Durable state (users, documents, grants, invitations, signatures and the
//! activity trail) lives in one relational database accessed through SeaORM.

/// Database storage module
pub mod database;

pub use database::{Database, DatabaseBackendType, Page};

use crate::config::StorageConfig;
use crate::utils::error::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Main storage layer
#[derive(Debug, Clone)]
pub struct StorageLayer {
    /// Database connection pool
    pub database: Arc<Database>,
}

/// Storage health snapshot for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct StorageHealthStatus {
    pub database: bool,
    pub overall: bool,
}

impl StorageLayer {
    /// Connect and, unless disabled, create missing tables
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        info!("Initializing storage layer");

        debug!("Connecting to database");
        let database = Arc::new(Database::new(&config.database).await?);

        let storage = Self { database };
        if config.database.run_migrations {
            storage.migrate().await?;
        }

        info!("Storage layer initialized successfully");
        Ok(storage)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        self.database.migrate().await
    }

    /// Health check for all storage backends
    pub async fn health_check(&self) -> StorageHealthStatus {
        let database = match self.database.health_check().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                false
            }
        };

        StorageHealthStatus {
            database,
            overall: database,
        }
    }

    /// Get database pool
    pub fn db(&self) -> &Database {
        &self.database
    }
}
