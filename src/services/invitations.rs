//! Invitation orchestration
//!
//! Wraps the pure lifecycle rules with persistence, the coarse document gate,
//! team gating by document status and outbound notifications.

use super::access::AccessService;
use super::activity::{ActivityLog, ClientInfo};
use super::notifications::{Notification, NotificationDispatcher, accept_url};
use crate::config::CollaborationConfig;
use crate::core::invitations::{self, NewInvitation};
use crate::core::models::{
    ActivityEvent, Document, Invitation, InvitationType, PermissionLevel, Team, User,
};
use crate::core::workflow::{self, WorkflowAction};
use crate::storage::StorageLayer;
use crate::utils::error::{DocflowError, Result};
use crate::utils::{is_valid_email, normalize_email};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvitationRequest {
    pub document_id: Uuid,
    pub email: String,
    pub team: Team,
    #[serde(default, rename = "type")]
    pub invitation_type: InvitationType,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcceptInvitationRequest {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeclineInvitationRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InvitationService {
    storage: Arc<StorageLayer>,
    access: AccessService,
    activity: ActivityLog,
    notifications: NotificationDispatcher,
    config: CollaborationConfig,
}

impl InvitationService {
    pub fn new(
        storage: Arc<StorageLayer>,
        access: AccessService,
        activity: ActivityLog,
        notifications: NotificationDispatcher,
        config: CollaborationConfig,
    ) -> Self {
        Self {
            storage,
            access,
            activity,
            notifications,
            config,
        }
    }

    /// Invite an email address into one team of a document
    pub async fn create(
        &self,
        actor: &User,
        request: CreateInvitationRequest,
        client: &ClientInfo,
    ) -> Result<Invitation> {
        let email = normalize_email(&request.email);
        if !is_valid_email(&email) {
            return Err(DocflowError::validation(format!(
                "Invalid email address: {}",
                request.email
            )));
        }

        let document = self
            .access
            .authorize(actor, request.document_id, PermissionLevel::Read, client)
            .await?
            .document;
        workflow::check(document.status, WorkflowAction::Invite(request.team))?;

        if let Some(mut existing) = self
            .storage
            .db()
            .find_pending_invitation(document.id(), &email)
            .await?
        {
            if !invitations::expire_if_due(&mut existing, Utc::now()) {
                return Err(DocflowError::conflict(
                    "A pending invitation already exists for this email",
                ));
            }
            self.storage.db().update_invitation(&existing).await?;
        }

        let invited_user_id = self
            .storage
            .db()
            .find_user_by_email(&email)
            .await?
            .map(|user| user.id());
        if let Some(user_id) = invited_user_id {
            if document.is_contributor(user_id) {
                return Err(DocflowError::conflict(
                    "User is already a contributor of this document",
                ));
            }
        }

        let (invitation, token) = invitations::issue(
            NewInvitation {
                document_id: document.id(),
                email,
                team: request.team,
                invitation_type: request.invitation_type,
                message: request.message,
                invited_by: actor.id(),
                invited_user_id,
            },
            self.config.invitation_ttl(),
            Utc::now(),
        )?;
        let invitation = self.storage.db().create_invitation(&invitation).await?;

        info!(
            "Invitation {} created for document {} ({})",
            invitation.id(),
            document.id(),
            invitation.team
        );
        self.notifications.dispatch(Notification::InvitationCreated {
            invitation_id: invitation.id(),
            document_id: document.id(),
            document_title: document.title.clone(),
            email: invitation.invited_email.clone(),
            team: invitation.team,
            accept_url: accept_url(&self.config.app_base_url, invitation.id(), &token),
        });
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::InvitationCreated {
                invitation_id: invitation.id(),
                document_id: document.id(),
                team: invitation.team,
            },
            client,
        );
        Ok(invitation)
    }

    /// Invitations addressed to the caller's email
    pub async fn list_mine(&self, user: &User) -> Result<Vec<Invitation>> {
        self.storage
            .db()
            .list_invitations_for_email(&user.email)
            .await
    }

    pub async fn list_for_document(&self, document: &Document) -> Result<Vec<Invitation>> {
        self.storage
            .db()
            .list_invitations_for_document(document.id())
            .await
    }

    /// Accept and join the invited team in one store transaction
    pub async fn accept(
        &self,
        user: &User,
        invitation_id: Uuid,
        request: AcceptInvitationRequest,
        client: &ClientInfo,
    ) -> Result<(Invitation, Document)> {
        let mut invitation = self.load(invitation_id).await?;
        let now = Utc::now();
        self.persist_expiry(&mut invitation, now).await?;

        invitations::accept(&mut invitation, user, request.token.as_deref(), now)?;

        let team = invitation.team;
        let for_admit = invitation.clone();
        let joining = user.clone();
        let (invitation, document) = self
            .storage
            .db()
            .accept_invitation(&invitation, move |document| {
                workflow::check(document.status, WorkflowAction::Invite(team))?;
                if document.team_of(joining.id()) == Some(team) {
                    return Ok(());
                }
                let contributor =
                    invitations::contributor_for(&for_admit, &joining, document.status);
                document.contributors.add(team, contributor)?;
                document.touch();
                Ok(())
            })
            .await?;

        info!(
            "User {} joined the {} team of document {}",
            user.id(),
            team,
            document.id()
        );
        self.record_resolution(user, &invitation, client);
        Ok((invitation, document))
    }

    pub async fn decline(
        &self,
        user: &User,
        invitation_id: Uuid,
        request: DeclineInvitationRequest,
        client: &ClientInfo,
    ) -> Result<Invitation> {
        let mut invitation = self.load(invitation_id).await?;
        if !invitations::is_addressed_to(&invitation, user) {
            return Err(DocflowError::forbidden("invitation_not_addressed_to_user"));
        }
        let now = Utc::now();
        self.persist_expiry(&mut invitation, now).await?;

        invitations::decline(&mut invitation, user, request.reason, now)?;
        let invitation = self.storage.db().update_invitation(&invitation).await?;

        self.record_resolution(user, &invitation, client);
        Ok(invitation)
    }

    /// Withdraw a pending invitation; inviter or admin
    pub async fn cancel(
        &self,
        actor: &User,
        invitation_id: Uuid,
        client: &ClientInfo,
    ) -> Result<Invitation> {
        let mut invitation = self.load(invitation_id).await?;
        invitations::cancel(&mut invitation, actor, Utc::now())?;
        let invitation = self.storage.db().update_invitation(&invitation).await?;

        self.record_resolution(actor, &invitation, client);
        Ok(invitation)
    }

    /// New token, new deadline, new notification
    pub async fn resend(
        &self,
        actor: &User,
        invitation_id: Uuid,
        client: &ClientInfo,
    ) -> Result<Invitation> {
        let mut invitation = self.load(invitation_id).await?;
        let token = invitations::resend(
            &mut invitation,
            actor,
            self.config.invitation_ttl(),
            Utc::now(),
        )?;

        let document = self.access.load_document(invitation.document_id).await?;
        workflow::check(document.status, WorkflowAction::Invite(invitation.team))?;
        let invitation = self.storage.db().update_invitation(&invitation).await?;

        self.notifications.dispatch(Notification::InvitationResent {
            invitation_id: invitation.id(),
            document_id: document.id(),
            document_title: document.title.clone(),
            email: invitation.invited_email.clone(),
            team: invitation.team,
            accept_url: accept_url(&self.config.app_base_url, invitation.id(), &token),
        });
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::InvitationResent {
                invitation_id: invitation.id(),
                document_id: document.id(),
            },
            client,
        );
        Ok(invitation)
    }

    async fn load(&self, invitation_id: Uuid) -> Result<Invitation> {
        self.storage
            .db()
            .find_invitation_by_id(invitation_id)
            .await?
            .ok_or_else(|| DocflowError::not_found("Invitation not found"))
    }

    /// Store a lazily detected expiry, then refuse the caller's action
    async fn persist_expiry(
        &self,
        invitation: &mut Invitation,
        now: chrono::DateTime<Utc>,
    ) -> Result<()> {
        if invitations::expire_if_due(invitation, now) {
            self.storage.db().update_invitation(invitation).await?;
            warn!("Invitation {} expired before it was used", invitation.id());
            return Err(DocflowError::conflict("Invitation has expired"));
        }
        Ok(())
    }

    fn record_resolution(&self, actor: &User, invitation: &Invitation, client: &ClientInfo) {
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::InvitationResolved {
                invitation_id: invitation.id(),
                document_id: invitation.document_id,
                status: invitation.status,
            },
            client,
        );
    }
}
