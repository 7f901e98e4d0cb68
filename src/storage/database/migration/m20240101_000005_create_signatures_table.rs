use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Signatures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Signatures::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Signatures::DocumentId).uuid().not_null())
                    .col(ColumnDef::new(Signatures::UserId).uuid().not_null())
                    .col(ColumnDef::new(Signatures::SignatureType).string().not_null())
                    .col(ColumnDef::new(Signatures::SignatureData).text().not_null())
                    .col(ColumnDef::new(Signatures::Comments).text().null())
                    .col(ColumnDef::new(Signatures::IpAddress).string().null())
                    .col(ColumnDef::new(Signatures::UserAgent).string().null())
                    .col(
                        ColumnDef::new(Signatures::SignedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // No foreign key to documents: signatures outlive a deleted document
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_signatures_document_id")
                    .table(Signatures::Table)
                    .col(Signatures::DocumentId)
                    .to_owned(),
            )
            .await?;

        // A signer holds at most one signature of each type per document
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_signatures_document_user_type")
                    .table(Signatures::Table)
                    .col(Signatures::DocumentId)
                    .col(Signatures::UserId)
                    .col(Signatures::SignatureType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Signatures::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Signatures {
    Table,
    Id,
    DocumentId,
    UserId,
    SignatureType,
    SignatureData,
    Comments,
    IpAddress,
    UserAgent,
    SignedAt,
}
