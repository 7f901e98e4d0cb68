use crate::core::models::ActivityRecord;
use crate::utils::error::{DocflowError, Result};
use sea_orm::*;
use uuid::Uuid;

use super::super::entities::{self, activity_log};
use super::types::{Page, SeaOrmDatabase, page_index};

impl SeaOrmDatabase {
    /// Append one audit record
    pub async fn insert_activity(&self, record: &ActivityRecord) -> Result<()> {
        entities::ActivityLog::insert(activity_log::Model::from_domain(record)?)
            .exec(&self.db)
            .await
            .map_err(DocflowError::Database)?;
        Ok(())
    }

    /// Audit records, newest first, optionally restricted to one actor
    pub async fn list_activity(
        &self,
        actor_id: Option<Uuid>,
        page: u64,
        limit: u64,
    ) -> Result<Page<ActivityRecord>> {
        let (index, limit) = page_index(page, limit);

        let mut query = entities::ActivityLog::find().order_by_desc(activity_log::Column::OccurredAt);
        if let Some(actor_id) = actor_id {
            query = query.filter(activity_log::Column::ActorId.eq(actor_id));
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
            .map(activity_log::Model::to_domain)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page { items, total })
    }

    /// Number of stored audit records
    pub async fn count_activity(&self) -> Result<u64> {
        entities::ActivityLog::find()
            .count(&self.db)
            .await
            .map_err(DocflowError::Database)
    }
}
