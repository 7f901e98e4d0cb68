use super::{parse_column, to_utc};
use crate::core::models::{Contributors, Metadata};
use crate::utils::error::Result as DocflowResult;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Document database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub reference: String,

    pub title: String,

    /// Human-facing revision label
    pub revision: String,

    pub status: String,

    pub created_by: Uuid,

    /// Authors, verifiers and validators
    pub contributors: Json,

    /// Membership index: every contributor id wrapped in `|`, e.g. `|id1|id2|`
    #[sea_orm(column_type = "Text")]
    pub contributor_ids: String,

    pub content: Json,

    pub published_at: Option<DateTimeWithTimeZone>,

    pub approved_at: Option<DateTimeWithTimeZone>,

    pub archived_at: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,

    /// Version for optimistic locking
    pub lock_version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::document_permission::Entity")]
    Permissions,

    #[sea_orm(has_many = "super::invitation::Entity")]
    Invitations,

    #[sea_orm(has_many = "super::signature::Entity")]
    Signatures,
}

impl Related<super::document_permission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Permissions.def()
    }
}

impl Related<super::invitation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invitations.def()
    }
}

impl Related<super::signature::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Signatures.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Token searched in `contributor_ids` for one user
pub fn membership_token(user_id: Uuid) -> String {
    format!("|{}|", user_id)
}

fn membership_index(contributors: &Contributors) -> String {
    let ids = contributors.user_ids();
    if ids.is_empty() {
        return String::new();
    }
    let joined = ids
        .iter()
        .map(Uuid::to_string)
        .collect::<Vec<_>>()
        .join("|");
    format!("|{}|", joined)
}

impl Model {
    /// Convert SeaORM model to domain document
    pub fn to_domain(&self) -> DocflowResult<crate::core::models::Document> {
        Ok(crate::core::models::Document {
            metadata: Metadata {
                id: self.id,
                created_at: to_utc(self.created_at),
                updated_at: to_utc(self.updated_at),
                version: self.lock_version,
            },
            reference: self.reference.clone(),
            title: self.title.clone(),
            revision: self.revision.clone(),
            status: parse_column("documents.status", &self.status)?,
            created_by: self.created_by,
            contributors: serde_json::from_value(self.contributors.clone())?,
            content: serde_json::from_value(self.content.clone())?,
            published_at: self.published_at.map(to_utc),
            approved_at: self.approved_at.map(to_utc),
            archived_at: self.archived_at.map(to_utc),
        })
    }

    /// Convert domain document to SeaORM active model
    pub fn from_domain(document: &crate::core::models::Document) -> DocflowResult<ActiveModel> {
        Ok(ActiveModel {
            id: Set(document.metadata.id),
            reference: Set(document.reference.clone()),
            title: Set(document.title.clone()),
            revision: Set(document.revision.clone()),
            status: Set(document.status.to_string()),
            created_by: Set(document.created_by),
            contributors: Set(serde_json::to_value(&document.contributors)?),
            contributor_ids: Set(membership_index(&document.contributors)),
            content: Set(serde_json::to_value(&document.content)?),
            published_at: Set(document.published_at.map(Into::into)),
            approved_at: Set(document.approved_at.map(Into::into)),
            archived_at: Set(document.archived_at.map(Into::into)),
            created_at: Set(document.metadata.created_at.into()),
            updated_at: Set(document.metadata.updated_at.into()),
            lock_version: Set(document.metadata.version),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{Contributor, Team};

    #[test]
    fn test_membership_index() {
        let mut contributors = Contributors::default();
        assert_eq!(membership_index(&contributors), "");

        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        contributors
            .add(Team::Authors, Contributor::new(a, "A", "Writer"))
            .unwrap();
        contributors
            .add(Team::Validators, Contributor::new(b, "B", "Director"))
            .unwrap();

        let index = membership_index(&contributors);
        assert!(index.contains(&membership_token(a)));
        assert!(index.contains(&membership_token(b)));
        assert!(!index.contains(&membership_token(Uuid::new_v4())));
    }
}
