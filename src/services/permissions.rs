//! Explicit permission grants on a document
//!
//! Callers are expected to hold admin-level access to the document; the
//! route gate enforces that before any method here runs.

use super::activity::{ActivityLog, ClientInfo};
use crate::core::models::{ActivityEvent, Document, Permission, PermissionLevel, User};
use crate::storage::StorageLayer;
use crate::utils::error::{DocflowError, Result};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct GrantPermissionRequest {
    pub user_id: Uuid,
    pub level: PermissionLevel,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePermissionRequest {
    pub level: PermissionLevel,
}

#[derive(Debug, Clone)]
pub struct PermissionService {
    storage: Arc<StorageLayer>,
    activity: ActivityLog,
}

impl PermissionService {
    pub fn new(storage: Arc<StorageLayer>, activity: ActivityLog) -> Self {
        Self { storage, activity }
    }

    pub async fn list(&self, document: &Document) -> Result<Vec<Permission>> {
        self.storage.db().list_permissions(document.id()).await
    }

    /// Grant or replace a user's level; returns the grant and whether it is new
    pub async fn grant(
        &self,
        actor: &User,
        document: &Document,
        request: GrantPermissionRequest,
        client: &ClientInfo,
    ) -> Result<(Permission, bool)> {
        if self
            .storage
            .db()
            .find_user_by_id(request.user_id)
            .await?
            .is_none()
        {
            return Err(DocflowError::not_found("User not found"));
        }

        self.store(actor, document, request.user_id, request.level, client)
            .await
    }

    /// Change the level of an existing grant
    pub async fn update(
        &self,
        actor: &User,
        document: &Document,
        user_id: Uuid,
        request: UpdatePermissionRequest,
        client: &ClientInfo,
    ) -> Result<Permission> {
        if self
            .storage
            .db()
            .find_permission(document.id(), user_id)
            .await?
            .is_none()
        {
            return Err(DocflowError::not_found("Permission not found"));
        }

        let (permission, _) = self
            .store(actor, document, user_id, request.level, client)
            .await?;
        Ok(permission)
    }

    pub async fn revoke(
        &self,
        actor: &User,
        document: &Document,
        user_id: Uuid,
        client: &ClientInfo,
    ) -> Result<()> {
        if !self
            .storage
            .db()
            .delete_permission(document.id(), user_id)
            .await?
        {
            return Err(DocflowError::not_found("Permission not found"));
        }

        info!(
            "Permission on document {} revoked for {} by {}",
            document.id(),
            user_id,
            actor.id()
        );
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::PermissionRevoked {
                document_id: document.id(),
                user_id,
            },
            client,
        );
        Ok(())
    }

    async fn store(
        &self,
        actor: &User,
        document: &Document,
        user_id: Uuid,
        level: PermissionLevel,
        client: &ClientInfo,
    ) -> Result<(Permission, bool)> {
        let (permission, created) = self
            .storage
            .db()
            .upsert_permission(document.id(), user_id, level, actor.id())
            .await?;

        info!(
            "Permission {} on document {} set for {} by {}",
            level,
            document.id(),
            user_id,
            actor.id()
        );
        self.activity.record(
            Some(actor.id()),
            ActivityEvent::PermissionGranted {
                document_id: document.id(),
                user_id,
                level,
            },
            client,
        );
        Ok((permission, created))
    }
}
