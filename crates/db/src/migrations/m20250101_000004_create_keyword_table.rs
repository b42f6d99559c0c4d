//! Create keywords table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Keyword::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Keyword::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Keyword::Keyword).string_len(255).not_null())
                    .col(ColumnDef::new(Keyword::ClerkUserId).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Keyword::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Keyword::Updated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Keyword text is unique within an owner's namespace
        manager
            .create_index(
                Index::create()
                    .name("unique_keyword_per_user")
                    .table(Keyword::Table)
                    .col(Keyword::Keyword)
                    .col(Keyword::ClerkUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_keyword_clerk_user_id")
                    .table(Keyword::Table)
                    .col(Keyword::ClerkUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Keyword::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Keyword {
    #[sea_orm(iden = "keywords")]
    Table,
    Id,
    Keyword,
    ClerkUserId,
    Created,
    Updated,
}
