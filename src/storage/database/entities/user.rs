use super::{parse_column, to_utc};
use crate::core::models::Metadata;
use crate::utils::error::Result as DocflowResult;
use sea_orm::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// User ID (UUID)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Email address (unique, lowercase)
    #[sea_orm(unique)]
    pub email: String,

    pub name: String,

    /// Password hash
    pub password_hash: String,

    /// User role
    pub role: String,

    /// User status
    pub status: String,

    /// Set when an administrator validated the account
    pub verified: bool,

    pub department: Option<String>,

    pub job_title: Option<String>,

    /// Last login timestamp
    pub last_login_at: Option<DateTimeWithTimeZone>,

    /// Creation timestamp
    pub created_at: DateTimeWithTimeZone,

    /// Last update timestamp
    pub updated_at: DateTimeWithTimeZone,

    /// Version for optimistic locking
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Convert SeaORM model to domain user model
    pub fn to_domain(&self) -> DocflowResult<crate::core::models::User> {
        Ok(crate::core::models::User {
            metadata: Metadata {
                id: self.id,
                created_at: to_utc(self.created_at),
                updated_at: to_utc(self.updated_at),
                version: self.version,
            },
            email: self.email.clone(),
            name: self.name.clone(),
            password_hash: self.password_hash.clone(),
            role: parse_column("users.role", &self.role)?,
            status: parse_column("users.status", &self.status)?,
            verified: self.verified,
            department: self.department.clone(),
            job_title: self.job_title.clone(),
            last_login_at: self.last_login_at.map(to_utc),
        })
    }

    /// Convert domain user model to SeaORM active model
    pub fn from_domain(user: &crate::core::models::User) -> ActiveModel {
        ActiveModel {
            id: Set(user.metadata.id),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.to_string()),
            status: Set(user.status.to_string()),
            verified: Set(user.verified),
            department: Set(user.department.clone()),
            job_title: Set(user.job_title.clone()),
            last_login_at: Set(user.last_login_at.map(Into::into)),
            created_at: Set(user.metadata.created_at.into()),
            updated_at: Set(user.metadata.updated_at.into()),
            version: Set(user.metadata.version),
        }
    }
}
