//! Document aggregate

use super::{Contributors, DocumentContent, DocumentStatus, Team};
use crate::core::models::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Initial revision label of every new or duplicated document
pub const INITIAL_REVISION: &str = "1.0";

/// Process document under collaborative editing and signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(flatten)]
    pub metadata: Metadata,
    pub reference: String,
    pub title: String,
    /// Human-facing revision label, independent of the lock version
    pub revision: String,
    pub status: DocumentStatus,
    /// Owner
    pub created_by: Uuid,
    pub contributors: Contributors,
    pub content: DocumentContent,
    pub published_at: Option<DateTime<Utc>>,
    pub approved_at: Option<DateTime<Utc>>,
    pub archived_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a draft owned by `created_by`
    pub fn new(reference: String, title: String, created_by: Uuid) -> Self {
        Self {
            metadata: Metadata::new(),
            reference,
            title,
            revision: INITIAL_REVISION.to_string(),
            status: DocumentStatus::Draft,
            created_by,
            contributors: Contributors::default(),
            content: DocumentContent::default(),
            published_at: None,
            approved_at: None,
            archived_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    pub fn version(&self) -> i64 {
        self.metadata.version
    }

    pub fn is_creator(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }

    pub fn team_of(&self, user_id: Uuid) -> Option<Team> {
        self.contributors.team_of(user_id)
    }

    pub fn is_contributor(&self, user_id: Uuid) -> bool {
        self.contributors.contains(user_id)
    }

    pub fn touch(&mut self) {
        self.metadata.touch();
    }
}
