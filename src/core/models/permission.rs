//! Explicit per-document permission grants

use crate::core::models::Metadata;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordered access level: read < write < sign < admin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    Read,
    Write,
    Sign,
    Admin,
}

impl PermissionLevel {
    pub const ALL: [PermissionLevel; 4] = [
        PermissionLevel::Read,
        PermissionLevel::Write,
        PermissionLevel::Sign,
        PermissionLevel::Admin,
    ];

    /// Whether holding `self` satisfies a request for `required`
    pub fn allows(&self, required: PermissionLevel) -> bool {
        *self >= required
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PermissionLevel::Read => "read",
            PermissionLevel::Write => "write",
            PermissionLevel::Sign => "sign",
            PermissionLevel::Admin => "admin",
        }
    }
}

impl std::fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PermissionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PermissionLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| format!("Invalid permission level: {}", s))
    }
}

/// One grant per (document, user); rewriting it replaces the level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    #[serde(flatten)]
    pub metadata: Metadata,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub level: PermissionLevel,
    pub granted_by: Uuid,
    pub granted_at: chrono::DateTime<chrono::Utc>,
}

impl Permission {
    pub fn new(document_id: Uuid, user_id: Uuid, level: PermissionLevel, granted_by: Uuid) -> Self {
        let metadata = Metadata::new();
        Self {
            granted_at: metadata.created_at,
            metadata,
            document_id,
            user_id,
            level,
            granted_by,
        }
    }

    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    /// Replace the level, recording who changed it
    pub fn regrant(&mut self, level: PermissionLevel, granted_by: Uuid) {
        self.level = level;
        self.granted_by = granted_by;
        self.metadata.touch();
        self.granted_at = self.metadata.updated_at;
    }
}
