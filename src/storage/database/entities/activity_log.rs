use super::to_utc;
use crate::core::models::ActivityRecord;
use crate::utils::error::Result as DocflowResult;
use crate::utils::logging::redact_sensitive;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit trail row; `details` holds the tagged event
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub actor_id: Option<Uuid>,
    pub action: String,
    pub document_id: Option<Uuid>,
    pub details: Json,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub occurred_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_domain(&self) -> DocflowResult<ActivityRecord> {
        Ok(ActivityRecord {
            id: self.id,
            actor_id: self.actor_id,
            event: serde_json::from_value(self.details.clone())?,
            ip_address: self.ip_address.clone(),
            user_agent: self.user_agent.clone(),
            occurred_at: to_utc(self.occurred_at),
        })
    }

    pub fn from_domain(record: &ActivityRecord) -> DocflowResult<ActiveModel> {
        let mut details = serde_json::to_value(&record.event)?;
        redact_sensitive(&mut details);

        Ok(ActiveModel {
            id: Set(record.id),
            actor_id: Set(record.actor_id),
            action: Set(record.event.action().to_string()),
            document_id: Set(record.event.document_id()),
            details: Set(details),
            ip_address: Set(record.ip_address.clone()),
            user_agent: Set(record.user_agent.clone()),
            occurred_at: Set(record.occurred_at.into()),
        })
    }
}
