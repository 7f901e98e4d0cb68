//! Test database utilities
//!
//! Each test gets an isolated in-memory SQLite database with the schema
//! already migrated.

use docflow::config::{DatabaseConfig, StorageConfig};
use docflow::storage::{Database, StorageLayer};
use std::sync::Arc;

/// Test database wrapper providing isolated in-memory SQLite instances
#[derive(Debug, Clone)]
pub struct TestDatabase {
    inner: Arc<StorageLayer>,
}

impl TestDatabase {
    pub async fn new() -> Self {
        let storage = StorageLayer::new(&StorageConfig {
            database: test_db_config(),
        })
        .await
        .expect("Failed to create in-memory test database");

        Self {
            inner: Arc::new(storage),
        }
    }

    pub fn db(&self) -> &Database {
        self.inner.db()
    }

    pub fn storage(&self) -> Arc<StorageLayer> {
        Arc::clone(&self.inner)
    }
}

/// In-memory SQLite; a single pooled connection keeps the schema alive
pub fn test_db_config() -> DatabaseConfig {
    DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        connection_timeout: 5,
        run_migrations: true,
    }
}
