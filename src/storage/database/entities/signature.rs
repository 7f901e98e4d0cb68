use super::{parse_column, to_utc};
use crate::utils::error::Result as DocflowResult;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only signature record; kept when its document is deleted
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "signatures")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub signature_type: String,
    #[sea_orm(column_type = "Text")]
    pub signature_data: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub comments: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub signed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id"
    )]
    Document,
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> DocflowResult<crate::core::models::Signature> {
        Ok(crate::core::models::Signature {
            id: self.id,
            document_id: self.document_id,
            user_id: self.user_id,
            signature_type: parse_column("signatures.signature_type", &self.signature_type)?,
            signature_data: self.signature_data.clone(),
            comments: self.comments.clone(),
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
            signed_at: to_utc(self.signed_at),
        })
    }

    pub fn from_domain(signature: &crate::core::models::Signature) -> ActiveModel {
        ActiveModel {
            id: Set(signature.id),
            document_id: Set(signature.document_id),
            user_id: Set(signature.user_id),
            signature_type: Set(signature.signature_type.to_string()),
            signature_data: Set(signature.signature_data.clone()),
            comments: Set(signature.comments.clone()),
            ip_address: Set(signature.ip_address.clone()),
            user_agent: Set(signature.user_agent.clone()),
            signed_at: Set(signature.signed_at.into()),
        }
    }
}
