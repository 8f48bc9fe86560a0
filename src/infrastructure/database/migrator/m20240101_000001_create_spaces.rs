//! Create spaces table

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Spaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Spaces::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Spaces::Label)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Spaces::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Spaces::Status)
                            .string()
                            .not_null()
                            .default("Free"),
                    )
                    .col(
                        ColumnDef::new(Spaces::HourlyRate)
                            .decimal_len(10, 2)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for the free-spaces-by-kind listing
        manager
            .create_index(
                Index::create()
                    .name("idx_spaces_kind")
                    .table(Spaces::Table)
                    .col(Spaces::Kind)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Spaces::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Spaces {
    Table,
    Id,
    Label,
    Kind,
    Status,
    HourlyRate,
}
