use crate::core::models::User;
use crate::utils::error::{DocflowError, Result};
use sea_orm::*;
use tracing::debug;
use uuid::Uuid;

use super::super::entities::{self, user};
use super::types::{Page, SeaOrmDatabase, page_index, unique_violation_as_conflict};

impl SeaOrmDatabase {
    /// Find user by ID
    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>> {
        debug!("Finding user by ID: {}", user_id);

        entities::User::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(DocflowError::Database)?
            .map(|model| model.to_domain())
            .transpose()
    }

    /// Find user by email, case-insensitively
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = crate::utils::normalize_email(email);
        debug!("Finding user by email: {}", email);

        entities::User::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(DocflowError::Database)?
            .map(|model| model.to_domain())
            .transpose()
    }

    /// Create a new user; a taken email is a conflict
    pub async fn create_user(&self, user: &User) -> Result<User> {
        debug!("Creating user: {}", user.email);

        entities::User::insert(user::Model::from_domain(user))
            .exec(&self.db)
            .await
            .map_err(|e| unique_violation_as_conflict(e, "Email already registered"))?;

        Ok(user.clone())
    }

    /// Persist every mutable field of an existing user
    pub async fn update_user(&self, user: &User) -> Result<User> {
        debug!("Updating user: {}", user.id());

        user::Model::from_domain(user)
            .update(&self.db)
            .await
            .map_err(|e| match e {
                DbErr::RecordNotUpdated => DocflowError::not_found("User not found"),
                other => DocflowError::Database(other),
            })?;

        Ok(user.clone())
    }

    /// List users, newest first
    pub async fn list_users(&self, page: u64, limit: u64) -> Result<Page<User>> {
        let (index, limit) = page_index(page, limit);
        let paginator = entities::User::find()
            .order_by_desc(user::Column::CreatedAt)
            .paginate(&self.db, limit);

        let total = paginator
            .num_items()
            .await
            .map_err(DocflowError::Database)?;
        let items = paginator
            .fetch_page(index)
            .await
            .map_err(DocflowError::Database)?
            .iter()
            .map(user::Model::to_domain)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page { items, total })
    }

    /// Count registered users
    pub async fn count_users(&self) -> Result<u64> {
        entities::User::find()
            .count(&self.db)
            .await
            .map_err(DocflowError::Database)
    }
}
