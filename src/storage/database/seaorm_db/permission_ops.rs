use crate::core::models::{Permission, PermissionLevel};
use crate::utils::error::{DocflowError, Result};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, document_permission};
use super::types::{SeaOrmDatabase, unique_violation_as_conflict};

impl SeaOrmDatabase {
    /// Grant `level` to the user on the document; an existing grant is
    /// overwritten. Returns the stored grant and whether it was newly created.
    pub async fn upsert_permission(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        level: PermissionLevel,
        granted_by: Uuid,
    ) -> Result<(Permission, bool)> {
        debug!(
            "Granting {} on document {} to user {}",
            level, document_id, user_id
        );

        if let Some(mut existing) = self.find_permission(document_id, user_id).await? {
            existing.regrant(level, granted_by);
            document_permission::Model::from_domain(&existing)
                .update(&self.db)
                .await
                .map_err(DocflowError::Database)?;
            return Ok((existing, false));
        }

        let permission = Permission::new(document_id, user_id, level, granted_by);
        entities::DocumentPermission::insert(document_permission::Model::from_domain(&permission))
            .exec(&self.db)
            .await
            .map_err(|e| {
                unique_violation_as_conflict(e, "Permission was granted concurrently; retry")
            })?;

        Ok((permission, true))
    }

    /// The user's explicit grant on a document, if any
    pub async fn find_permission(
        &self,
        document_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Permission>> {
        entities::DocumentPermission::find()
            .filter(document_permission::Column::DocumentId.eq(document_id))
            .filter(document_permission::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(DocflowError::Database)?
            .map(|model| model.to_domain())
            .transpose()
    }

    /// All grants on a document, oldest first
    pub async fn list_permissions(&self, document_id: Uuid) -> Result<Vec<Permission>> {
        entities::DocumentPermission::find()
            .filter(document_permission::Column::DocumentId.eq(document_id))
            .order_by_asc(document_permission::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(DocflowError::Database)?
            .iter()
            .map(document_permission::Model::to_domain)
            .collect()
    }

    /// Revoke a grant; returns whether one existed
    pub async fn delete_permission(&self, document_id: Uuid, user_id: Uuid) -> Result<bool> {
        debug!(
            "Revoking permission on document {} for user {}",
            document_id, user_id
        );

        let result = entities::DocumentPermission::delete_many()
            .filter(document_permission::Column::DocumentId.eq(document_id))
            .filter(document_permission::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(DocflowError::Database)?;

        Ok(result.rows_affected > 0)
    }
}
