//! Audit trail events
//!
//! Each variant carries exactly the fields that may be persisted; nothing is
//! copied from request payloads wholesale.

use crate::core::access::DenyReason;
use crate::core::models::{
    DocumentStatus, InvitationStatus, PermissionLevel, SignatureType, Team, UserRole, UserStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActivityEvent {
    DocumentCreated {
        document_id: Uuid,
        reference: String,
    },
    DocumentUpdated {
        document_id: Uuid,
        version: i64,
    },
    DocumentDeleted {
        document_id: Uuid,
    },
    DocumentPublished {
        document_id: Uuid,
        contributors: usize,
    },
    DocumentAdvanced {
        document_id: Uuid,
        from: DocumentStatus,
        to: DocumentStatus,
    },
    DocumentArchived {
        document_id: Uuid,
        from: DocumentStatus,
    },
    DocumentDuplicated {
        source_id: Uuid,
        document_id: Uuid,
        kept_contributors: bool,
    },
    DocumentSigned {
        document_id: Uuid,
        signature_type: SignatureType,
        status: DocumentStatus,
    },
    PermissionGranted {
        document_id: Uuid,
        user_id: Uuid,
        level: PermissionLevel,
    },
    PermissionRevoked {
        document_id: Uuid,
        user_id: Uuid,
    },
    InvitationCreated {
        invitation_id: Uuid,
        document_id: Uuid,
        team: Team,
    },
    InvitationResent {
        invitation_id: Uuid,
        document_id: Uuid,
    },
    InvitationResolved {
        invitation_id: Uuid,
        document_id: Uuid,
        status: InvitationStatus,
    },
    AccessDenied {
        document_id: Uuid,
        required: PermissionLevel,
        reason: DenyReason,
    },
    UserRegistered {
        user_id: Uuid,
    },
    UserStatusChanged {
        user_id: Uuid,
        status: UserStatus,
    },
    UserRoleChanged {
        user_id: Uuid,
        role: UserRole,
    },
    LoginSucceeded,
    LoginFailed {
        email: String,
    },
}

impl ActivityEvent {
    /// Stable action name, identical to the serialized tag
    pub fn action(&self) -> &'static str {
        match self {
            ActivityEvent::DocumentCreated { .. } => "document_created",
            ActivityEvent::DocumentUpdated { .. } => "document_updated",
            ActivityEvent::DocumentDeleted { .. } => "document_deleted",
            ActivityEvent::DocumentPublished { .. } => "document_published",
            ActivityEvent::DocumentAdvanced { .. } => "document_advanced",
            ActivityEvent::DocumentArchived { .. } => "document_archived",
            ActivityEvent::DocumentDuplicated { .. } => "document_duplicated",
            ActivityEvent::DocumentSigned { .. } => "document_signed",
            ActivityEvent::PermissionGranted { .. } => "permission_granted",
            ActivityEvent::PermissionRevoked { .. } => "permission_revoked",
            ActivityEvent::InvitationCreated { .. } => "invitation_created",
            ActivityEvent::InvitationResent { .. } => "invitation_resent",
            ActivityEvent::InvitationResolved { .. } => "invitation_resolved",
            ActivityEvent::AccessDenied { .. } => "access_denied",
            ActivityEvent::UserRegistered { .. } => "user_registered",
            ActivityEvent::UserStatusChanged { .. } => "user_status_changed",
            ActivityEvent::UserRoleChanged { .. } => "user_role_changed",
            ActivityEvent::LoginSucceeded => "login_succeeded",
            ActivityEvent::LoginFailed { .. } => "login_failed",
        }
    }

    /// Document the event concerns, used for filtering
    pub fn document_id(&self) -> Option<Uuid> {
        match self {
            ActivityEvent::DocumentCreated { document_id, .. }
            | ActivityEvent::DocumentUpdated { document_id, .. }
            | ActivityEvent::DocumentDeleted { document_id }
            | ActivityEvent::DocumentPublished { document_id, .. }
            | ActivityEvent::DocumentAdvanced { document_id, .. }
            | ActivityEvent::DocumentArchived { document_id, .. }
            | ActivityEvent::DocumentDuplicated { document_id, .. }
            | ActivityEvent::DocumentSigned { document_id, .. }
            | ActivityEvent::PermissionGranted { document_id, .. }
            | ActivityEvent::PermissionRevoked { document_id, .. }
            | ActivityEvent::InvitationCreated { document_id, .. }
            | ActivityEvent::InvitationResent { document_id, .. }
            | ActivityEvent::InvitationResolved { document_id, .. }
            | ActivityEvent::AccessDenied { document_id, .. } => Some(*document_id),
            _ => None,
        }
    }

    /// Security-relevant events are logged at warn as they are emitted
    pub fn is_security_event(&self) -> bool {
        matches!(
            self,
            ActivityEvent::AccessDenied { .. } | ActivityEvent::LoginFailed { .. }
        )
    }
}

/// An event plus who caused it and when
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    #[serde(flatten)]
    pub event: ActivityEvent,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl ActivityRecord {
    pub fn new(actor_id: Option<Uuid>, event: ActivityEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id,
            event,
            ip_address: None,
            user_agent: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn with_client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent.map(|ua| ua.chars().take(200).collect());
        self
    }
}
