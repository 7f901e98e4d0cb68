//! Core data models
//!
//! This module defines the data structures shared by the storage, service and
//! HTTP layers.

pub mod activity;
pub mod document;
pub mod invitation;
pub mod permission;
pub mod signature;
pub mod user;

pub use activity::*;
pub use document::*;
pub use invitation::*;
pub use permission::*;
pub use signature::*;
pub use user::*;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Common metadata for all models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Unique identifier
    pub id: Uuid,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last update timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// Version for optimistic locking
    pub version: i64,
}

impl Default for Metadata {
    fn default() -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

impl Metadata {
    /// Create new metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the timestamp and increment version
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
        self.version += 1;
    }
}
