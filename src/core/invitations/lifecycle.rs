//! Invitation state transitions

use super::token::{generate_token, hash_token, token_matches};
use crate::core::models::{
    Contributor, ContributorStatus, DocumentStatus, Invitation, InvitationStatus, InvitationType,
    Metadata, Team, User,
};
use crate::utils::error::{DocflowError, Result};
use crate::utils::{is_valid_email, normalize_email};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Request to invite an email address into a document team
#[derive(Debug, Clone)]
pub struct NewInvitation {
    pub document_id: Uuid,
    pub email: String,
    pub team: Team,
    pub invitation_type: InvitationType,
    pub message: Option<String>,
    pub invited_by: Uuid,
    /// Resolved when the email belongs to a registered user
    pub invited_user_id: Option<Uuid>,
}

/// Build a pending invitation and its raw acceptance token
pub fn issue(
    request: NewInvitation,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<(Invitation, String)> {
    let email = normalize_email(&request.email);
    if !is_valid_email(&email) {
        return Err(DocflowError::validation(format!(
            "Invalid email address: {}",
            request.email
        )));
    }

    let token = generate_token();
    let metadata = Metadata {
        created_at: now,
        updated_at: now,
        ..Metadata::new()
    };

    let invitation = Invitation {
        metadata,
        document_id: request.document_id,
        invited_email: email,
        invited_user_id: request.invited_user_id,
        team: request.team,
        invitation_type: request.invitation_type,
        status: InvitationStatus::Pending,
        message: request
            .message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty()),
        token_hash: hash_token(&token),
        invited_by: request.invited_by,
        expires_at: now + ttl,
        accepted_at: None,
        declined_at: None,
        decline_reason: None,
        cancelled_at: None,
        resent_count: 0,
    };

    Ok((invitation, token))
}

/// Persistable expiry: a pending invitation past its deadline becomes `expired`.
///
/// Returns whether the status changed.
pub fn expire_if_due(invitation: &mut Invitation, now: DateTime<Utc>) -> bool {
    if invitation.is_pending() && invitation.is_expired_at(now) {
        invitation.status = InvitationStatus::Expired;
        invitation.metadata.touch();
        true
    } else {
        false
    }
}

/// Whether the invitation targets this user, by resolved id or by email
pub fn is_addressed_to(invitation: &Invitation, user: &User) -> bool {
    invitation.invited_user_id == Some(user.id())
        || normalize_email(&user.email) == invitation.invited_email
}

fn ensure_pending(invitation: &Invitation, now: DateTime<Utc>) -> Result<()> {
    if invitation.can_accept_at(now) {
        return Ok(());
    }
    match invitation.status {
        InvitationStatus::Pending => Err(DocflowError::conflict("Invitation has expired")),
        InvitationStatus::Accepted => Err(DocflowError::conflict("Invitation already accepted")),
        status => Err(DocflowError::conflict(format!("Invitation is {}", status))),
    }
}

/// Accept on behalf of `user`.
///
/// The user must be the invitee (session identity or matching email). A
/// token, when presented, must also be the current one.
pub fn accept(
    invitation: &mut Invitation,
    user: &User,
    token: Option<&str>,
    now: DateTime<Utc>,
) -> Result<()> {
    ensure_pending(invitation, now)?;

    if !is_addressed_to(invitation, user) {
        return Err(DocflowError::forbidden("invitation_not_addressed_to_user"));
    }
    if token.is_some_and(|t| !token_matches(t, &invitation.token_hash)) {
        return Err(DocflowError::forbidden("invalid_invitation_token"));
    }

    invitation.status = InvitationStatus::Accepted;
    invitation.accepted_at = Some(now);
    invitation.invited_user_id = Some(user.id());
    invitation.metadata.touch();
    Ok(())
}

/// Decline; only the invitee may do this
pub fn decline(
    invitation: &mut Invitation,
    user: &User,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<()> {
    if !is_addressed_to(invitation, user) {
        return Err(DocflowError::forbidden("invitation_not_addressed_to_user"));
    }
    ensure_pending(invitation, now)?;

    invitation.status = InvitationStatus::Declined;
    invitation.declined_at = Some(now);
    invitation.decline_reason = reason.map(|r| r.trim().to_string()).filter(|r| !r.is_empty());
    invitation.metadata.touch();
    Ok(())
}

/// Cancel; only the inviter or an admin may do this
pub fn cancel(invitation: &mut Invitation, actor: &User, now: DateTime<Utc>) -> Result<()> {
    if invitation.invited_by != actor.id() && !actor.is_admin() {
        return Err(DocflowError::forbidden("not_invitation_owner"));
    }
    if invitation.status.is_terminal() {
        return Err(DocflowError::conflict(format!(
            "Invitation is {}",
            invitation.status
        )));
    }

    invitation.status = InvitationStatus::Cancelled;
    invitation.cancelled_at = Some(now);
    invitation.metadata.touch();
    Ok(())
}

/// Re-issue the token and push the deadline back; status stays pending.
///
/// Returns the new raw token.
pub fn resend(
    invitation: &mut Invitation,
    actor: &User,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String> {
    if invitation.invited_by != actor.id() && !actor.is_admin() {
        return Err(DocflowError::forbidden("not_invitation_owner"));
    }
    if invitation.status.is_terminal() {
        return Err(DocflowError::conflict(format!(
            "Only pending invitations can be resent (invitation is {})",
            invitation.status
        )));
    }

    let token = generate_token();
    invitation.token_hash = hash_token(&token);
    invitation.expires_at = now + ttl;
    invitation.resent_count += 1;
    invitation.metadata.touch();
    Ok(token)
}

/// Contributor entry created when the invitation is accepted
pub fn contributor_for(
    invitation: &Invitation,
    user: &User,
    document_status: DocumentStatus,
) -> Contributor {
    let status = if document_status == DocumentStatus::Draft {
        ContributorStatus::Joined
    } else {
        ContributorStatus::Pending
    };

    let mut contributor = Contributor::new(
        user.id(),
        user.name.clone(),
        user.job_title.clone().unwrap_or_default(),
    )
    .with_department(user.department.clone().unwrap_or_default())
    .with_status(status);
    contributor.invited_at = invitation.metadata.created_at;
    contributor
}
