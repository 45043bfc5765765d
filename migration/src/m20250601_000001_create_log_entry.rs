use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(LogEntry::Table)
                    .if_not_exists()
                    .col(integer(LogEntry::TmdbId).primary_key())
                    .col(string(LogEntry::Title))
                    .col(string_null(LogEntry::PosterPath))
                    .col(string(LogEntry::Status))
                    .col(integer_null(LogEntry::Rating))
                    .col(text_null(LogEntry::Comment))
                    .col(string_null(LogEntry::WatchedDate))
                    .col(big_integer(LogEntry::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_log_entry_status")
                    .table(LogEntry::Table)
                    .col(LogEntry::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_log_entry_created_at")
                    .table(LogEntry::Table)
                    .col(LogEntry::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(LogEntry::Table).to_owned()).await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum LogEntry {
    Table,
    TmdbId,
    Title,
    PosterPath,
    Status,
    Rating,
    Comment,
    WatchedDate,
    CreatedAt,
}
