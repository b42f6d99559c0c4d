//! Create filters table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Filter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Filter::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Filter::Word).string_len(255).not_null())
                    .col(ColumnDef::new(Filter::ClerkUserId).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Filter::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Filter::Updated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Filter word is unique within an owner's namespace
        manager
            .create_index(
                Index::create()
                    .name("unique_filter_per_user")
                    .table(Filter::Table)
                    .col(Filter::Word)
                    .col(Filter::ClerkUserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_filter_clerk_user_id")
                    .table(Filter::Table)
                    .col(Filter::ClerkUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Filter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Filter {
    #[sea_orm(iden = "filters")]
    Table,
    Id,
    Word,
    ClerkUserId,
    Created,
    Updated,
}
