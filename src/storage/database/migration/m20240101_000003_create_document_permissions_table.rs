use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DocumentPermissions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DocumentPermissions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(DocumentPermissions::DocumentId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DocumentPermissions::UserId).uuid().not_null())
                    .col(ColumnDef::new(DocumentPermissions::Level).string().not_null())
                    .col(
                        ColumnDef::new(DocumentPermissions::GrantedBy)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentPermissions::GrantedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DocumentPermissions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DocumentPermissions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DocumentPermissions::Version)
                            .big_integer()
                            .not_null()
                            .default(1),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_document_permissions_document_id")
                            .from(DocumentPermissions::Table, DocumentPermissions::DocumentId)
                            .to(Documents::Table, Documents::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One grant per (document, user)
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_document_permissions_document_user")
                    .table(DocumentPermissions::Table)
                    .col(DocumentPermissions::DocumentId)
                    .col(DocumentPermissions::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_document_permissions_user_id")
                    .table(DocumentPermissions::Table)
                    .col(DocumentPermissions::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DocumentPermissions::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum DocumentPermissions {
    Table,
    Id,
    DocumentId,
    UserId,
    Level,
    GrantedBy,
    GrantedAt,
    CreatedAt,
    UpdatedAt,
    Version,
}

#[derive(DeriveIden)]
enum Documents {
    Table,
    Id,
}
