/// Activity log entity module
pub mod activity_log;
/// Document entity module
pub mod document;
/// Document permission entity module
pub mod document_permission;
/// Invitation entity module
pub mod invitation;
/// Signature entity module
pub mod signature;
/// User entity module
pub mod user;

pub use activity_log::Entity as ActivityLog;
pub use document::Entity as Document;
pub use document_permission::Entity as DocumentPermission;
pub use invitation::Entity as Invitation;
pub use signature::Entity as Signature;
pub use user::Entity as User;

use crate::utils::error::{DocflowError, Result as DocflowResult};
use std::str::FromStr;

/// Parse an enum column; a bad value means the row was written by something else
pub(crate) fn parse_column<T>(column: &str, value: &str) -> DocflowResult<T>
where
    T: FromStr<Err = String>,
{
    T::from_str(value)
        .map_err(|e| DocflowError::internal(format!("Corrupt {} column: {}", column, e)))
}

/// Convert a stored timestamp to UTC
pub(crate) fn to_utc(value: sea_orm::prelude::DateTimeWithTimeZone) -> chrono::DateTime<chrono::Utc> {
    value.with_timezone(&chrono::Utc)
}
