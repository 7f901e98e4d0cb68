use crate::core::models::{Document, Signature, SignatureType};
use crate::utils::error::{DocflowError, Result};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, signature};
use super::document_ops::write_document;
use super::types::{SeaOrmDatabase, unique_violation_as_conflict};

impl SeaOrmDatabase {
    /// Append a signature and save the signed document in one transaction
    pub async fn record_signature(
        &self,
        signature: &Signature,
        document: &Document,
        expected_version: i64,
    ) -> Result<Document> {
        debug!(
            "Recording {} signature of user {} on document {}",
            signature.signature_type, signature.user_id, signature.document_id
        );

        let txn = self.db.begin().await.map_err(DocflowError::Database)?;

        entities::Signature::insert(signature::Model::from_domain(signature))
            .exec(&txn)
            .await
            .map_err(|e| unique_violation_as_conflict(e, "Document already signed by this user"))?;
        let document = write_document(&txn, document, expected_version).await?;

        txn.commit().await.map_err(DocflowError::Database)?;
        Ok(document)
    }

    /// Signatures of a document in signing order
    pub async fn list_signatures(&self, document_id: Uuid) -> Result<Vec<Signature>> {
        entities::Signature::find()
            .filter(signature::Column::DocumentId.eq(document_id))
            .order_by_asc(signature::Column::SignedAt)
            .all(&self.db)
            .await
            .map_err(DocflowError::Database)?
            .iter()
            .map(signature::Model::to_domain)
            .collect()
    }

    /// Whether the user already holds a signature of this type on the document
    pub async fn signature_exists(
        &self,
        document_id: Uuid,
        user_id: Uuid,
        signature_type: SignatureType,
    ) -> Result<bool> {
        let count = entities::Signature::find()
            .filter(signature::Column::DocumentId.eq(document_id))
            .filter(signature::Column::UserId.eq(user_id))
            .filter(signature::Column::SignatureType.eq(signature_type.as_str()))
            .count(&self.db)
            .await
            .map_err(DocflowError::Database)?;

        Ok(count > 0)
    }
}
