use crate::core::models::{Document, Invitation, InvitationStatus};
use crate::utils::error::{DocflowError, Result};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, invitation};
use super::document_ops::write_document;
use super::types::{SeaOrmDatabase, unique_violation_as_conflict};

fn to_domain_all(models: Vec<invitation::Model>) -> Result<Vec<Invitation>> {
    models.iter().map(invitation::Model::to_domain).collect()
}

impl SeaOrmDatabase {
    /// Insert a new invitation
    pub async fn create_invitation(&self, invitation: &Invitation) -> Result<Invitation> {
        debug!(
            "Creating invitation for {} on document {}",
            invitation.invited_email, invitation.document_id
        );

        entities::Invitation::insert(invitation::Model::from_domain(invitation))
            .exec(&self.db)
            .await
            .map_err(|e| unique_violation_as_conflict(e, "Invitation token collision"))?;

        Ok(invitation.clone())
    }

    /// Find invitation by ID
    pub async fn find_invitation_by_id(&self, invitation_id: Uuid) -> Result<Option<Invitation>> {
        entities::Invitation::find_by_id(invitation_id)
            .one(&self.db)
            .await
            .map_err(DocflowError::Database)?
            .map(|model| model.to_domain())
            .transpose()
    }

    /// The pending invitation of `email` to a document, if any
    pub async fn find_pending_invitation(
        &self,
        document_id: Uuid,
        email: &str,
    ) -> Result<Option<Invitation>> {
        entities::Invitation::find()
            .filter(invitation::Column::DocumentId.eq(document_id))
            .filter(invitation::Column::InvitedEmail.eq(crate::utils::normalize_email(email)))
            .filter(invitation::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .one(&self.db)
            .await
            .map_err(DocflowError::Database)?
            .map(|model| model.to_domain())
            .transpose()
    }

    /// The accepted invitation of a user to a document, if any
    pub async fn find_accepted_invitation(
        &self,
        document_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Invitation>> {
        entities::Invitation::find()
            .filter(invitation::Column::DocumentId.eq(document_id))
            .filter(invitation::Column::InvitedUserId.eq(user_id))
            .filter(invitation::Column::Status.eq(InvitationStatus::Accepted.as_str()))
            .one(&self.db)
            .await
            .map_err(DocflowError::Database)?
            .map(|model| model.to_domain())
            .transpose()
    }

    /// All invitations of a document, newest first
    pub async fn list_invitations_for_document(
        &self,
        document_id: Uuid,
    ) -> Result<Vec<Invitation>> {
        let models = entities::Invitation::find()
            .filter(invitation::Column::DocumentId.eq(document_id))
            .order_by_desc(invitation::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(DocflowError::Database)?;
        to_domain_all(models)
    }

    /// All invitations addressed to an email, newest first
    pub async fn list_invitations_for_email(&self, email: &str) -> Result<Vec<Invitation>> {
        let models = entities::Invitation::find()
            .filter(invitation::Column::InvitedEmail.eq(crate::utils::normalize_email(email)))
            .order_by_desc(invitation::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(DocflowError::Database)?;
        to_domain_all(models)
    }

    /// Persist an invitation's current state
    pub async fn update_invitation(&self, invitation: &Invitation) -> Result<Invitation> {
        debug!(
            "Updating invitation {} to {}",
            invitation.id(),
            invitation.status
        );

        invitation::Model::from_domain(invitation)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => DocflowError::not_found("Invitation not found"),
                other => DocflowError::Database(other),
            })?;

        Ok(invitation.clone())
    }

    /// Store an accepted invitation and admit its user to the document in
    /// one transaction.
    ///
    /// `admit` runs against the document as read inside the transaction. The
    /// stored invitation must still be pending, so a concurrent second accept
    /// fails with `Conflict` and never adds a contributor twice.
    pub async fn accept_invitation<F>(
        &self,
        accepted: &Invitation,
        admit: F,
    ) -> Result<(Invitation, Document)>
    where
        F: FnOnce(&mut Document) -> Result<()> + Send,
    {
        debug!("Accepting invitation {}", accepted.id());

        let txn = self.db.begin().await.map_err(DocflowError::Database)?;

        let mut document = entities::Document::find_by_id(accepted.document_id)
            .one(&txn)
            .await
            .map_err(DocflowError::Database)?
            .ok_or_else(|| DocflowError::not_found("Document not found"))?
            .to_domain()?;
        let expected_version = document.version();

        admit(&mut document)?;
        let document = write_document(&txn, &document, expected_version).await?;

        let result = entities::Invitation::update_many()
            .set(invitation::Model::from_domain(accepted))
            .filter(invitation::Column::Id.eq(accepted.id()))
            .filter(invitation::Column::Status.eq(InvitationStatus::Pending.as_str()))
            .exec(&txn)
            .await
            .map_err(DocflowError::Database)?;
        if result.rows_affected == 0 {
            // Dropping the transaction rolls back the document write
            return Err(DocflowError::conflict("Invitation is no longer pending"));
        }

        txn.commit().await.map_err(DocflowError::Database)?;
        Ok((accepted.clone(), document))
    }
}
