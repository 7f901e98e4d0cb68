//! Document access gate
//!
//! Loads what the decision engine needs for one (user, document) pair,
//! asks it, and turns a denial into an audit event plus a `Forbidden` that
//! carries only the public reason code.

use super::activity::{ActivityLog, ClientInfo};
use crate::core::access::{AccessContext, AccessDecision, AccessGrant, DenyReason, decide};
use crate::core::models::{ActivityEvent, Document, PermissionLevel, User};
use crate::storage::StorageLayer;
use crate::utils::error::{DocflowError, Result};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcome of a successful gate check
#[derive(Debug, Clone)]
pub struct AuthorizedDocument {
    pub document: Document,
    pub grant: AccessGrant,
}

#[derive(Debug, Clone)]
pub struct AccessService {
    storage: Arc<StorageLayer>,
    activity: ActivityLog,
}

impl AccessService {
    pub fn new(storage: Arc<StorageLayer>, activity: ActivityLog) -> Self {
        Self { storage, activity }
    }

    /// Load a document; a missing one is `NotFound`, never `Forbidden`
    pub async fn load_document(&self, document_id: Uuid) -> Result<Document> {
        self.storage
            .db()
            .find_document_by_id(document_id)
            .await?
            .ok_or_else(|| DocflowError::not_found("Document not found"))
    }

    /// Decide for an already loaded document.
    ///
    /// Store lookups are skipped when a cheaper path already answers: admins
    /// and creators need no grant, and the accepted-invitation fallback is
    /// only consulted when nothing else relates the user to the document.
    pub async fn decide(
        &self,
        user: &User,
        document: &Document,
        required: PermissionLevel,
    ) -> Result<AccessDecision> {
        let ctx = AccessContext::new(user, document);
        if user.is_admin() || document.is_creator(user.id()) {
            return Ok(decide(&ctx, required));
        }

        let permission = self
            .storage
            .db()
            .find_permission(document.id(), user.id())
            .await?;
        let ctx = ctx.with_permission(permission.as_ref());
        let decision = decide(&ctx, required);
        if decision != AccessDecision::Deny(DenyReason::NoRelationship) {
            return Ok(decision);
        }

        let invitation = self
            .storage
            .db()
            .find_accepted_invitation(document.id(), user.id())
            .await?;
        Ok(decide(
            &ctx.with_accepted_invitation(invitation.as_ref()),
            required,
        ))
    }

    /// Gate check on an already loaded document
    pub async fn authorize_document(
        &self,
        user: &User,
        document: Document,
        required: PermissionLevel,
        client: &ClientInfo,
    ) -> Result<AuthorizedDocument> {
        match self.decide(user, &document, required).await? {
            AccessDecision::Allow(grant) => {
                debug!(
                    user = %user.id(),
                    document = %document.id(),
                    required = %required,
                    ?grant,
                    "Document access granted"
                );
                Ok(AuthorizedDocument { document, grant })
            }
            AccessDecision::Deny(reason) => {
                warn!(
                    user = %user.id(),
                    document = %document.id(),
                    required = %required,
                    reason = %reason,
                    "Document access denied"
                );
                self.activity.record(
                    Some(user.id()),
                    ActivityEvent::AccessDenied {
                        document_id: document.id(),
                        required,
                        reason,
                    },
                    client,
                );
                Err(DocflowError::forbidden(reason.public_code()))
            }
        }
    }

    /// Load then gate-check a document
    pub async fn authorize(
        &self,
        user: &User,
        document_id: Uuid,
        required: PermissionLevel,
        client: &ClientInfo,
    ) -> Result<AuthorizedDocument> {
        let document = self.load_document(document_id).await?;
        self.authorize_document(user, document, required, client)
            .await
    }
}
