use super::{parse_column, to_utc};
use crate::core::models::Metadata;
use crate::utils::error::Result as DocflowResult;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Invitation database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub document_id: Uuid,
    /// Lowercase
    pub invited_email: String,
    pub invited_user_id: Option<Uuid>,
    pub team: String,
    pub invitation_type: String,
    pub status: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    /// SHA-256 hex of the acceptance token
    #[sea_orm(unique)]
    pub token_hash: String,
    pub invited_by: Uuid,
    pub expires_at: DateTimeWithTimeZone,
    pub accepted_at: Option<DateTimeWithTimeZone>,
    pub declined_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub decline_reason: Option<String>,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub resent_count: i32,
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
    pub fn to_domain(&self) -> DocflowResult<crate::core::models::Invitation> {
        Ok(crate::core::models::Invitation {
            metadata: Metadata {
                id: self.id,
                created_at: to_utc(self.created_at),
                updated_at: to_utc(self.updated_at),
                version: self.version,
            },
            document_id: self.document_id,
            invited_email: self.invited_email.clone(),
            invited_user_id: self.invited_user_id,
            team: parse_column("invitations.team", &self.team)?,
            invitation_type: parse_column("invitations.invitation_type", &self.invitation_type)?,
            status: parse_column("invitations.status", &self.status)?,
            message: self.message.clone(),
            token_hash: self.token_hash.clone(),
            invited_by: self.invited_by,
            expires_at: to_utc(self.expires_at),
            accepted_at: self.accepted_at.map(to_utc),
            declined_at: self.declined_at.map(to_utc),
            decline_reason: self.decline_reason.clone(),
            cancelled_at: self.cancelled_at.map(to_utc),
            resent_count: self.resent_count,
        })
    }

    pub fn from_domain(invitation: &crate::core::models::Invitation) -> ActiveModel {
        ActiveModel {
            id: Set(invitation.metadata.id),
            document_id: Set(invitation.document_id),
            invited_email: Set(invitation.invited_email.clone()),
            invited_user_id: Set(invitation.invited_user_id),
            team: Set(invitation.team.to_string()),
            invitation_type: Set(invitation.invitation_type.to_string()),
            status: Set(invitation.status.to_string()),
            message: Set(invitation.message.clone()),
            token_hash: Set(invitation.token_hash.clone()),
            invited_by: Set(invitation.invited_by),
            expires_at: Set(invitation.expires_at.into()),
            accepted_at: Set(invitation.accepted_at.map(Into::into)),
            declined_at: Set(invitation.declined_at.map(Into::into)),
            decline_reason: Set(invitation.decline_reason.clone()),
            cancelled_at: Set(invitation.cancelled_at.map(Into::into)),
            resent_count: Set(invitation.resent_count),
            created_at: Set(invitation.metadata.created_at.into()),
            updated_at: Set(invitation.metadata.updated_at.into()),
            version: Set(invitation.metadata.version),
        }
    }
}
