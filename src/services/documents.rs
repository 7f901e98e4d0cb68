//! Document lifecycle orchestration
//!
//! Every method receives a document that already passed the access gate at
//! the level its route requires; what remains here is the state machine,
//! persistence and side effects.

use super::access::AuthorizedDocument;
use super::activity::{ActivityLog, ClientInfo};
use super::notifications::{Notification, NotificationDispatcher};
use crate::config::CollaborationConfig;
use crate::core::models::{
    ActivityEvent, Contributors, Document, DocumentContent, PermissionLevel, Team, User,
};
use crate::core::workflow;
use crate::storage::{Page, StorageLayer};
use crate::utils::error::{DocflowError, Result};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

const MAX_REFERENCE_LENGTH: usize = 64;
const MAX_TITLE_LENGTH: usize = 255;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub reference: String,
    pub title: String,
    #[serde(default)]
    pub content: Option<DocumentContent>,
}

/// Partial update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDocumentRequest {
    pub reference: Option<String>,
    pub title: Option<String>,
    pub content: Option<DocumentContent>,
    /// Replace the contributor lists; needs admin-level access
    pub contributors: Option<Contributors>,
    /// Lock version the client last read
    pub expected_version: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DuplicateDocumentRequest {
    #[serde(default)]
    pub keep_contributors: bool,
}

fn validate_label(field: &str, value: &str, max: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DocflowError::validation(format!("{} is required", field)));
    }
    if value.chars().count() > max {
        return Err(DocflowError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

#[derive(Debug, Clone)]
pub struct DocumentService {
    storage: Arc<StorageLayer>,
    activity: ActivityLog,
    notifications: NotificationDispatcher,
    config: CollaborationConfig,
}

impl DocumentService {
    pub fn new(
        storage: Arc<StorageLayer>,
        activity: ActivityLog,
        notifications: NotificationDispatcher,
        config: CollaborationConfig,
    ) -> Self {
        Self {
            storage,
            activity,
            notifications,
            config,
        }
    }

    /// Create a draft owned by the caller
    pub async fn create(
        &self,
        actor: &User,
        request: CreateDocumentRequest,
        client: &ClientInfo,
    ) -> Result<Document> {
        let reference = validate_label("Reference", &request.reference, MAX_REFERENCE_LENGTH)?;
        let title = validate_label("Title", &request.title, MAX_TITLE_LENGTH)?;

        let mut document = Document::new(reference, title, actor.id());
        if let Some(content) = request.content {
            document.content = content;
        }

        let document = self.storage.db().create_document(&document).await?;
        info!("Document {} created by {}", document.id(), actor.id());
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::DocumentCreated {
                document_id: document.id(),
                reference: document.reference.clone(),
            },
            client,
        );
        Ok(document)
    }

    /// Documents the caller can reach
    pub async fn list(&self, actor: &User, page: u64, limit: u64) -> Result<Page<Document>> {
        self.storage
            .db()
            .list_documents_for_user(actor, page, limit)
            .await
    }

    /// Edit a draft
    pub async fn update(
        &self,
        actor: &User,
        authorized: AuthorizedDocument,
        request: UpdateDocumentRequest,
        client: &ClientInfo,
    ) -> Result<Document> {
        let AuthorizedDocument { mut document, grant } = authorized;
        workflow::ensure_editable(&document)?;

        let expected_version = document.version();
        if let Some(version) = request.expected_version {
            if version != expected_version {
                return Err(DocflowError::conflict(format!(
                    "Document is at version {}, not {}",
                    expected_version, version
                )));
            }
        }

        if let Some(reference) = request.reference {
            document.reference = validate_label("Reference", &reference, MAX_REFERENCE_LENGTH)?;
        }
        if let Some(title) = request.title {
            document.title = validate_label("Title", &title, MAX_TITLE_LENGTH)?;
        }
        if let Some(content) = request.content {
            document.content = content;
        }
        if let Some(contributors) = request.contributors {
            if !grant.level().allows(PermissionLevel::Admin) {
                return Err(DocflowError::forbidden("insufficient_access_level"));
            }
            contributors.check_disjoint()?;
            document.contributors = contributors;
        }

        let document = self
            .storage
            .db()
            .update_document(&document, expected_version)
            .await?;
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::DocumentUpdated {
                document_id: document.id(),
                version: document.version(),
            },
            client,
        );
        Ok(document)
    }

    /// Delete; managers and admins only
    pub async fn delete(
        &self,
        actor: &User,
        document: Document,
        client: &ClientInfo,
    ) -> Result<()> {
        if !actor.is_manager_or_admin() {
            return Err(DocflowError::forbidden("manager_role_required"));
        }

        if !self.storage.db().delete_document(document.id()).await? {
            return Err(DocflowError::not_found("Document not found"));
        }

        info!("Document {} deleted by {}", document.id(), actor.id());
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::DocumentDeleted {
                document_id: document.id(),
            },
            client,
        );
        Ok(())
    }

    /// Draft → author review; contributors are asked to sign
    pub async fn publish(
        &self,
        actor: &User,
        mut document: Document,
        client: &ClientInfo,
    ) -> Result<Document> {
        let expected_version = document.version();
        let outcome = workflow::publish(
            &mut document,
            self.config.require_authors_to_publish,
            Utc::now(),
        )?;
        if outcome.authors_missing {
            warn!(
                "Document {} published without authors; nobody can sign it yet",
                document.id()
            );
        }

        let document = self
            .storage
            .db()
            .update_document(&document, expected_version)
            .await?;

        self.notifications.dispatch(Notification::DocumentPublished {
            document_id: document.id(),
            document_title: document.title.clone(),
            recipients: document.contributors.user_ids(),
        });
        if !outcome.signers.is_empty() {
            self.notifications.dispatch(Notification::SignatureRequested {
                document_id: document.id(),
                document_title: document.title.clone(),
                team: Team::Authors,
                recipients: outcome.signers,
            });
        }
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::DocumentPublished {
                document_id: document.id(),
                contributors: document.contributors.len(),
            },
            client,
        );
        Ok(document)
    }

    /// Open the next review stage
    pub async fn advance(
        &self,
        actor: &User,
        mut document: Document,
        client: &ClientInfo,
    ) -> Result<Document> {
        let expected_version = document.version();
        let (from, to) = workflow::advance(&mut document)?;
        let document = self
            .storage
            .db()
            .update_document(&document, expected_version)
            .await?;

        if let Some(team) = workflow::signing_team(to) {
            self.notifications.dispatch(Notification::SignatureRequested {
                document_id: document.id(),
                document_title: document.title.clone(),
                team,
                recipients: document
                    .contributors
                    .team(team)
                    .iter()
                    .map(|c| c.user_id)
                    .collect(),
            });
        }
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::DocumentAdvanced {
                document_id: document.id(),
                from,
                to,
            },
            client,
        );
        Ok(document)
    }

    /// Retire a document; admins only
    pub async fn archive(
        &self,
        actor: &User,
        mut document: Document,
        client: &ClientInfo,
    ) -> Result<Document> {
        let expected_version = document.version();
        let from = workflow::archive(&mut document, actor, Utc::now())?;
        let document = self
            .storage
            .db()
            .update_document(&document, expected_version)
            .await?;

        self.activity.record(
            Some(actor.id()),
            ActivityEvent::DocumentArchived {
                document_id: document.id(),
                from,
            },
            client,
        );
        Ok(document)
    }

    /// Copy into a new draft owned by the caller
    pub async fn duplicate(
        &self,
        actor: &User,
        source: &Document,
        request: DuplicateDocumentRequest,
        client: &ClientInfo,
    ) -> Result<Document> {
        let copy = workflow::duplicate(source, actor.id(), request.keep_contributors);
        let copy = self.storage.db().create_document(&copy).await?;

        self.activity.record(
            Some(actor.id()),
            ActivityEvent::DocumentDuplicated {
                source_id: source.id(),
                document_id: copy.id(),
                kept_contributors: request.keep_contributors,
            },
            client,
        );
        Ok(copy)
    }
}
