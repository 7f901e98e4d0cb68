//! Decision order

use super::types::{AccessContext, AccessDecision, AccessGrant, DenyReason};
use crate::core::models::PermissionLevel;

/// Find the strongest path from the user to the document, first match wins:
/// admin, creator, explicit permission, contributor, accepted invitation.
///
/// An explicit permission is consulted before contributor membership so that
/// a downgrade to `read` restricts a contributor.
pub fn resolve_grant(ctx: &AccessContext<'_>) -> Option<AccessGrant> {
    let user_id = ctx.user.id();

    if ctx.user.is_admin() {
        return Some(AccessGrant::Admin);
    }

    if ctx.document.is_creator(user_id) {
        return Some(AccessGrant::Creator);
    }

    if let Some(permission) = ctx
        .permission
        .filter(|p| p.document_id == ctx.document.id() && p.user_id == user_id)
    {
        return Some(AccessGrant::Permission {
            level: permission.level,
        });
    }

    if let Some(team) = ctx.document.team_of(user_id) {
        return Some(AccessGrant::Contributor { team });
    }

    ctx.accepted_invitation
        .filter(|invitation| {
            invitation.document_id == ctx.document.id()
                && invitation.invited_user_id == Some(user_id)
                && invitation.status == crate::core::models::InvitationStatus::Accepted
        })
        .map(|invitation| AccessGrant::AcceptedInvitation {
            team: invitation.team,
        })
}

/// Decide whether the user may act on the document at `required` level
pub fn decide(ctx: &AccessContext<'_>, required: PermissionLevel) -> AccessDecision {
    match resolve_grant(ctx) {
        Some(grant) if grant.level().allows(required) => AccessDecision::Allow(grant),
        Some(AccessGrant::Permission { .. }) => {
            AccessDecision::Deny(DenyReason::PermissionBelowRequired)
        }
        Some(_) => AccessDecision::Deny(DenyReason::ContributorLevelExceeded),
        None => AccessDecision::Deny(DenyReason::NoRelationship),
    }
}
