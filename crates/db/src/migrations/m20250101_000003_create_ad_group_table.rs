//! Create ad_groups table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_ad_campaign_table::AdCampaign;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdGroup::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdGroup::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdGroup::Title).string_len(255).not_null())
                    .col(ColumnDef::new(AdGroup::ClerkUserId).string_len(255).not_null())
                    .col(
                        ColumnDef::new(AdGroup::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AdGroup::AdCampaignId).integer())
                    .col(
                        ColumnDef::new(AdGroup::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AdGroup::Updated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_group_ad_campaign")
                            .from(AdGroup::Table, AdGroup::AdCampaignId)
                            .to(AdCampaign::Table, AdCampaign::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ad_group_clerk_user_id")
                    .table(AdGroup::Table)
                    .col(AdGroup::ClerkUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ad_group_ad_campaign_id")
                    .table(AdGroup::Table)
                    .col(AdGroup::AdCampaignId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdGroup::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AdGroup {
    #[sea_orm(iden = "ad_groups")]
    Table,
    Id,
    Title,
    ClerkUserId,
    IsActive,
    AdCampaignId,
    Created,
    Updated,
}
