//! Access decision types

use crate::core::models::{Document, Invitation, Permission, PermissionLevel, Team, User};
use crate::utils::error::{DocflowError, Result};
use serde::{Deserialize, Serialize};

/// Everything the engine needs to know about one user and one document
#[derive(Debug, Clone, Copy)]
pub struct AccessContext<'a> {
    pub user: &'a User,
    pub document: &'a Document,
    /// The user's explicit grant on this document
    pub permission: Option<&'a Permission>,
    /// An accepted invitation of this user to this document
    pub accepted_invitation: Option<&'a Invitation>,
}

impl<'a> AccessContext<'a> {
    pub fn new(user: &'a User, document: &'a Document) -> Self {
        Self {
            user,
            document,
            permission: None,
            accepted_invitation: None,
        }
    }

    pub fn with_permission(mut self, permission: Option<&'a Permission>) -> Self {
        self.permission = permission;
        self
    }

    pub fn with_accepted_invitation(mut self, invitation: Option<&'a Invitation>) -> Self {
        self.accepted_invitation = invitation;
        self
    }
}

/// The path through which a user reaches a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum AccessGrant {
    Admin,
    Creator,
    Permission { level: PermissionLevel },
    Contributor { team: Team },
    AcceptedInvitation { team: Team },
}

impl AccessGrant {
    /// Highest level this grant confers.
    ///
    /// Contributors may read, write and sign (team matching is the workflow's
    /// job) but never administer.
    pub fn level(&self) -> PermissionLevel {
        match self {
            AccessGrant::Admin | AccessGrant::Creator => PermissionLevel::Admin,
            AccessGrant::Permission { level } => *level,
            AccessGrant::Contributor { .. } | AccessGrant::AcceptedInvitation { .. } => {
                PermissionLevel::Sign
            }
        }
    }

    /// Team membership carried by the grant, if any
    pub fn team(&self) -> Option<Team> {
        match self {
            AccessGrant::Contributor { team } | AccessGrant::AcceptedInvitation { team } => {
                Some(*team)
            }
            _ => None,
        }
    }
}

/// Internal reason for a refusal; only `public_code` reaches clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyReason {
    /// An explicit permission exists but is below the requested level
    PermissionBelowRequired,
    /// Contributor or invitee asked for administrative access
    ContributorLevelExceeded,
    /// Not creator, contributor, invitee or permission holder
    NoRelationship,
}

impl DenyReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::PermissionBelowRequired => "permission_below_required",
            DenyReason::ContributorLevelExceeded => "contributor_level_exceeded",
            DenyReason::NoRelationship => "no_relationship",
        }
    }

    /// Stable code returned to the client
    pub fn public_code(&self) -> &'static str {
        match self {
            DenyReason::PermissionBelowRequired | DenyReason::ContributorLevelExceeded => {
                "insufficient_access_level"
            }
            DenyReason::NoRelationship => "no_document_access",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow(AccessGrant),
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow(_))
    }

    pub fn grant(&self) -> Option<AccessGrant> {
        match self {
            AccessDecision::Allow(grant) => Some(*grant),
            AccessDecision::Deny(_) => None,
        }
    }

    /// Convert into a `Forbidden` error carrying only the public code
    pub fn into_result(self) -> Result<AccessGrant> {
        match self {
            AccessDecision::Allow(grant) => Ok(grant),
            AccessDecision::Deny(reason) => Err(DocflowError::forbidden(reason.public_code())),
        }
    }
}
