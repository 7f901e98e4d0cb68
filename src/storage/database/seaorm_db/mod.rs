// Module declarations
mod types;
mod connection;
mod user_ops;
mod document_ops;
mod permission_ops;
mod invitation_ops;
mod signature_ops;
mod activity_ops;


// Re-export public types
pub use types::{DatabaseBackendType, Page, SeaOrmDatabase};
