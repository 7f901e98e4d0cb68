//! Collaboration workflow settings

use super::*;
use serde::{Deserialize, Serialize};

/// Settings for invitations, publishing and the audit trail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaborationConfig {
    /// Days before a pending invitation expires
    #[serde(default = "default_invitation_ttl_days")]
    pub invitation_ttl_days: i64,
    /// Refuse to publish a draft without authors
    #[serde(default)]
    pub require_authors_to_publish: bool,
    /// Deadline for best-effort side effects (audit writes, notifications)
    #[serde(default = "default_audit_deadline_ms")]
    pub audit_deadline_ms: u64,
    /// Capacity of the activity outbox
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
    /// Base URL used to build invitation acceptance links
    #[serde(default = "default_app_base_url")]
    pub app_base_url: String,
}

impl Default for CollaborationConfig {
    fn default() -> Self {
        Self {
            invitation_ttl_days: default_invitation_ttl_days(),
            require_authors_to_publish: false,
            audit_deadline_ms: default_audit_deadline_ms(),
            outbox_capacity: default_outbox_capacity(),
            app_base_url: default_app_base_url(),
        }
    }
}

impl CollaborationConfig {
    pub fn invitation_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.invitation_ttl_days)
    }

    pub fn audit_deadline(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.audit_deadline_ms)
    }
}
