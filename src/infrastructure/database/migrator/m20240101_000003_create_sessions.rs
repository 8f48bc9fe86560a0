//! Create sessions table
//!
//! Carries the core occupancy constraint: a partial unique index on
//! `space_id` over rows with a null `exit_time`, so a second concurrent
//! open on the same space fails at the storage layer instead of corrupting
//! the one-open-session-per-space invariant.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_spaces::Spaces;
use super::m20240101_000002_create_vehicles::Vehicles;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::SpaceId).integer().not_null())
                    .col(ColumnDef::new(Sessions::VehicleId).integer().not_null())
                    .col(
                        ColumnDef::new(Sessions::EntryTime)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Sessions::ExitTime).timestamp_with_time_zone())
                    .col(ColumnDef::new(Sessions::Charge).decimal_len(10, 2))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_space")
                            .from(Sessions::Table, Sessions::SpaceId)
                            .to(Spaces::Table, Spaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sessions_vehicle")
                            .from(Sessions::Table, Sessions::VehicleId)
                            .to(Vehicles::Table, Vehicles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for per-space lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_space")
                    .table(Sessions::Table)
                    .col(Sessions::SpaceId)
                    .to_owned(),
            )
            .await?;

        // Index for per-vehicle history
        manager
            .create_index(
                Index::create()
                    .name("idx_sessions_vehicle")
                    .table(Sessions::Table)
                    .col(Sessions::VehicleId)
                    .to_owned(),
            )
            .await?;

        // At most one open session per space. SeaQuery's index builder has no
        // partial-index support, so this one is raw SQL.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS ux_sessions_open_space \
                 ON sessions (space_id) WHERE exit_time IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Sessions {
    Table,
    Id,
    SpaceId,
    VehicleId,
    EntryTime,
    ExitTime,
    Charge,
}
