use crate::core::models::{Document, InvitationStatus, User};
use crate::utils::error::{DocflowError, Result};
use chrono::Utc;
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, document, document_permission, invitation};
use super::types::{Page, SeaOrmDatabase, page_index};

/// Compare-and-swap write of a document on any connection or transaction.
///
/// Succeeds only while the stored lock version still equals
/// `expected_version`; the returned document carries the new version.
pub(super) async fn write_document<C: ConnectionTrait>(
    conn: &C,
    document: &Document,
    expected_version: i64,
) -> Result<Document> {
    let mut stored = document.clone();
    stored.metadata.version = expected_version + 1;
    stored.metadata.updated_at = Utc::now();

    let result = entities::Document::update_many()
        .set(document::Model::from_domain(&stored)?)
        .filter(document::Column::Id.eq(document.id()))
        .filter(document::Column::LockVersion.eq(expected_version))
        .exec(conn)
        .await
        .map_err(DocflowError::Database)?;

    if result.rows_affected == 0 {
        let exists = entities::Document::find_by_id(document.id())
            .one(conn)
            .await
            .map_err(DocflowError::Database)?
            .is_some();
        return Err(if exists {
            DocflowError::conflict("Document was modified concurrently; reload and retry")
        } else {
            DocflowError::not_found("Document not found")
        });
    }

    Ok(stored)
}

impl SeaOrmDatabase {
    /// Insert a new document
    pub async fn create_document(&self, document: &Document) -> Result<Document> {
        debug!("Creating document: {}", document.reference);

        entities::Document::insert(document::Model::from_domain(document)?)
            .exec(&self.db)
            .await
            .map_err(DocflowError::Database)?;

        Ok(document.clone())
    }

    /// Find document by ID
    pub async fn find_document_by_id(&self, document_id: Uuid) -> Result<Option<Document>> {
        debug!("Finding document by ID: {}", document_id);

        entities::Document::find_by_id(document_id)
            .one(&self.db)
            .await
            .map_err(DocflowError::Database)?
            .map(|model| model.to_domain())
            .transpose()
    }

    /// Documents the user can reach: all of them for admins, otherwise owned,
    /// contributed to, explicitly granted or reached via accepted invitation
    pub async fn list_documents_for_user(
        &self,
        user: &User,
        page: u64,
        limit: u64,
    ) -> Result<Page<Document>> {
        let (index, limit) = page_index(page, limit);
        let mut query = entities::Document::find().order_by_desc(document::Column::UpdatedAt);

        if !user.is_admin() {
            let granted: Vec<Uuid> = entities::DocumentPermission::find()
                .select_only()
                .column(document_permission::Column::DocumentId)
                .filter(document_permission::Column::UserId.eq(user.id()))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(DocflowError::Database)?;

            let invited: Vec<Uuid> = entities::Invitation::find()
                .select_only()
                .column(invitation::Column::DocumentId)
                .filter(invitation::Column::InvitedUserId.eq(user.id()))
                .filter(invitation::Column::Status.eq(InvitationStatus::Accepted.as_str()))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(DocflowError::Database)?;

            query = query.filter(
                Condition::any()
                    .add(document::Column::CreatedBy.eq(user.id()))
                    .add(document::Column::ContributorIds.contains(
                        document::membership_token(user.id()),
                    ))
                    .add(document::Column::Id.is_in(granted))
                    .add(document::Column::Id.is_in(invited)),
            );
        }

        let paginator = query.paginate(&self.db, limit);
        let total = paginator
            .num_items()
            .await
            .map_err(DocflowError::Database)?;
        let items = paginator
            .fetch_page(index)
            .await
            .map_err(DocflowError::Database)?
            .iter()
            .map(document::Model::to_domain)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page { items, total })
    }

    /// Save a document if nobody else wrote it since `expected_version`
    pub async fn update_document(
        &self,
        document: &Document,
        expected_version: i64,
    ) -> Result<Document> {
        debug!(
            "Updating document {} at version {}",
            document.id(),
            expected_version
        );
        write_document(&self.db, document, expected_version).await
    }

    /// Delete a document together with its grants and invitations.
    ///
    /// Signatures stay as the audit record of who signed what.
    pub async fn delete_document(&self, document_id: Uuid) -> Result<bool> {
        debug!("Deleting document: {}", document_id);

        let txn = self.db.begin().await.map_err(DocflowError::Database)?;

        entities::DocumentPermission::delete_many()
            .filter(document_permission::Column::DocumentId.eq(document_id))
            .exec(&txn)
            .await
            .map_err(DocflowError::Database)?;
        entities::Invitation::delete_many()
            .filter(invitation::Column::DocumentId.eq(document_id))
            .exec(&txn)
            .await
            .map_err(DocflowError::Database)?;
        let result = entities::Document::delete_by_id(document_id)
            .exec(&txn)
            .await
            .map_err(DocflowError::Database)?;

        txn.commit().await.map_err(DocflowError::Database)?;
        Ok(result.rows_affected > 0)
    }
}
