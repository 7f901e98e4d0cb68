//! E-signatures
//!
//! Signing appends a signature record and saves the signer's contributor
//! entry (and any stage completion) in one transaction.

use super::access::AuthorizedDocument;
use super::activity::{ActivityLog, ClientInfo};
use super::notifications::{Notification, NotificationDispatcher};
use crate::core::models::{
    ActivityEvent, Document, DocumentStatus, Signature, SignatureType, User,
};
use crate::core::workflow;
use crate::storage::StorageLayer;
use crate::utils::error::{DocflowError, Result};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

const MAX_USER_AGENT_LENGTH: usize = 200;

#[derive(Debug, Clone, Deserialize)]
pub struct SignDocumentRequest {
    /// Defaults to the type collected in the current stage
    #[serde(default, rename = "type")]
    pub signature_type: Option<SignatureType>,
    pub signature_data: String,
    #[serde(default)]
    pub comments: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SignatureService {
    storage: Arc<StorageLayer>,
    activity: ActivityLog,
    notifications: NotificationDispatcher,
}

impl SignatureService {
    pub fn new(
        storage: Arc<StorageLayer>,
        activity: ActivityLog,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            storage,
            activity,
            notifications,
        }
    }

    pub async fn list(&self, document: &Document) -> Result<Vec<Signature>> {
        self.storage.db().list_signatures(document.id()).await
    }

    /// Sign the document for the caller's team
    pub async fn sign(
        &self,
        actor: &User,
        authorized: AuthorizedDocument,
        request: SignDocumentRequest,
        client: &ClientInfo,
    ) -> Result<(Signature, Document)> {
        let signature_data = request.signature_data.trim();
        if signature_data.is_empty() {
            return Err(DocflowError::validation("Signature data is required"));
        }

        let mut document = authorized.document;
        let kind = match request.signature_type {
            Some(kind) => kind,
            None => workflow::signing_team(document.status)
                .map(|team| team.signature_type())
                .ok_or_else(|| DocflowError::invalid_transition(document.status, "sign"))?,
        };

        if self
            .storage
            .db()
            .signature_exists(document.id(), actor.id(), kind)
            .await?
        {
            return Err(DocflowError::conflict(format!(
                "User has already signed this document as {}",
                kind
            )));
        }

        let now = Utc::now();
        let expected_version = document.version();
        let outcome = workflow::record_signature(&mut document, actor.id(), kind, now)?;

        let mut signature = Signature::new(
            document.id(),
            actor.id(),
            kind,
            signature_data.to_string(),
        );
        signature.signed_at = now;
        signature.comments = request
            .comments
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        signature.ip_address = client.ip_address.clone();
        signature.user_agent = client
            .user_agent
            .as_ref()
            .map(|ua| ua.chars().take(MAX_USER_AGENT_LENGTH).collect());

        let document = self
            .storage
            .db()
            .record_signature(&signature, &document, expected_version)
            .await?;

        info!(
            "Document {} signed by {} as {}",
            document.id(),
            actor.id(),
            kind
        );
        if let Some(status) = outcome.completed {
            info!("The {} team finished signing document {}", outcome.team, document.id());
            if status == DocumentStatus::Approved {
                let mut recipients = document.contributors.user_ids();
                if !recipients.contains(&document.created_by) {
                    recipients.push(document.created_by);
                }
                self.notifications.dispatch(Notification::DocumentApproved {
                    document_id: document.id(),
                    document_title: document.title.clone(),
                    recipients,
                });
            }
        }
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::DocumentSigned {
                document_id: document.id(),
                signature_type: kind,
                status: document.status,
            },
            client,
        );
        Ok((signature, document))
    }
}
