use super::{parse_column, to_utc};
use crate::core::models::Metadata;
use crate::utils::error::Result as DocflowResult;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Explicit per-document grant; one row per (document, user)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "document_permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    pub level: String,
    pub granted_by: Uuid,
    pub granted_at: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::document::Entity",
        from = "Column::DocumentId",
        to = "super::document::Column::Id",
        on_delete = "Cascade"
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
    pub fn to_domain(&self) -> DocflowResult<crate::core::models::Permission> {
        Ok(crate::core::models::Permission {
            metadata: Metadata {
                id: self.id,
                created_at: to_utc(self.created_at),
                updated_at: to_utc(self.updated_at),
                version: self.version,
            },
            document_id: self.document_id,
            user_id: self.user_id,
            level: parse_column("document_permissions.level", &self.level)?,
            granted_by: self.granted_by,
            granted_at: to_utc(self.granted_at),
        })
    }

    pub fn from_domain(permission: &crate::core::models::Permission) -> ActiveModel {
        ActiveModel {
            id: Set(permission.metadata.id),
            document_id: Set(permission.document_id),
            user_id: Set(permission.user_id),
            level: Set(permission.level.to_string()),
            granted_by: Set(permission.granted_by),
            granted_at: Set(permission.granted_at.into()),
            created_at: Set(permission.metadata.created_at.into()),
            updated_at: Set(permission.metadata.updated_at.into()),
            version: Set(permission.metadata.version),
        }
    }
}
