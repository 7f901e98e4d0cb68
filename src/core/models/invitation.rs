//! Document invitation models

use crate::core::models::{Metadata, Team};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invitation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationStatus {
    /// Pending acceptance
    Pending,
    /// Accepted
    Accepted,
    /// Declined
    Declined,
    /// Expired
    Expired,
    /// Cancelled
    Cancelled,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Pending => "pending",
            InvitationStatus::Accepted => "accepted",
            InvitationStatus::Declined => "declined",
            InvitationStatus::Expired => "expired",
            InvitationStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, InvitationStatus::Pending)
    }
}

impl std::fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for InvitationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "declined" => Ok(InvitationStatus::Declined),
            "expired" => Ok(InvitationStatus::Expired),
            "cancelled" => Ok(InvitationStatus::Cancelled),
            _ => Err(format!("Invalid invitation status: {}", s)),
        }
    }
}

/// What the invitee is asked to do
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvitationType {
    #[default]
    Collaborator,
    Reviewer,
}

impl std::fmt::Display for InvitationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvitationType::Collaborator => write!(f, "collaborator"),
            InvitationType::Reviewer => write!(f, "reviewer"),
        }
    }
}

impl std::str::FromStr for InvitationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collaborator" => Ok(InvitationType::Collaborator),
            "reviewer" => Ok(InvitationType::Reviewer),
            _ => Err(format!("Invalid invitation type: {}", s)),
        }
    }
}

/// Invitation to join one team of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invitation {
    #[serde(flatten)]
    pub metadata: Metadata,
    pub document_id: Uuid,
    /// Stored lowercase
    pub invited_email: String,
    /// Set when the email belongs to a known user
    pub invited_user_id: Option<Uuid>,
    pub team: Team,
    #[serde(rename = "type")]
    pub invitation_type: InvitationType,
    pub status: InvitationStatus,
    pub message: Option<String>,
    /// SHA-256 of the acceptance token
    #[serde(skip_serializing, default)]
    pub token_hash: String,
    pub invited_by: Uuid,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub declined_at: Option<DateTime<Utc>>,
    pub decline_reason: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub resent_count: i32,
}

impl Invitation {
    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    pub fn is_pending(&self) -> bool {
        self.status == InvitationStatus::Pending
    }

    /// Check if invitation is expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Pending and inside its validity window
    pub fn can_accept_at(&self, now: DateTime<Utc>) -> bool {
        self.is_pending() && !self.is_expired_at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_only_pending_is_open() {
        assert!(!InvitationStatus::Pending.is_terminal());
        for status in [
            InvitationStatus::Accepted,
            InvitationStatus::Declined,
            InvitationStatus::Expired,
            InvitationStatus::Cancelled,
        ] {
            assert!(status.is_terminal(), "{} should be terminal", status);
        }
    }

    #[test]
    fn test_can_accept_inside_window_only() {
        let now = Utc::now();
        let mut invitation = Invitation {
            metadata: Metadata::new(),
            document_id: Uuid::new_v4(),
            invited_email: "bob@example.com".to_string(),
            invited_user_id: None,
            team: Team::Authors,
            invitation_type: InvitationType::Collaborator,
            status: InvitationStatus::Pending,
            message: None,
            token_hash: String::new(),
            invited_by: Uuid::new_v4(),
            expires_at: now + Duration::days(1),
            accepted_at: None,
            declined_at: None,
            decline_reason: None,
            cancelled_at: None,
            resent_count: 0,
        };

        assert!(invitation.can_accept_at(now));
        assert!(!invitation.can_accept_at(now + Duration::days(2)));

        invitation.status = InvitationStatus::Declined;
        assert!(!invitation.can_accept_at(now));
    }
}
