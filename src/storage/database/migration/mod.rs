use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_documents_table;
mod m20240101_000003_create_document_permissions_table;
mod m20240101_000004_create_invitations_table;
mod m20240101_000005_create_signatures_table;
mod m20240101_000006_create_activity_logs_table;

/// Database migrator for SeaORM
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_documents_table::Migration),
            Box::new(m20240101_000003_create_document_permissions_table::Migration),
            Box::new(m20240101_000004_create_invitations_table::Migration),
            Box::new(m20240101_000005_create_signatures_table::Migration),
            Box::new(m20240101_000006_create_activity_logs_table::Migration),
        ]
    }
}
