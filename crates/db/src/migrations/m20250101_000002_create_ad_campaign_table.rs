//! Create ad_campaigns table migration.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_company_table::Company;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdCampaign::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdCampaign::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdCampaign::Title).string_len(255).not_null())
                    .col(
                        ColumnDef::new(AdCampaign::ClerkUserId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdCampaign::IsActive)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AdCampaign::CompanyId).integer())
                    .col(
                        ColumnDef::new(AdCampaign::Created)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(AdCampaign::Updated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_campaign_company")
                            .from(AdCampaign::Table, AdCampaign::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ad_campaign_clerk_user_id")
                    .table(AdCampaign::Table)
                    .col(AdCampaign::ClerkUserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ad_campaign_company_id")
                    .table(AdCampaign::Table)
                    .col(AdCampaign::CompanyId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdCampaign::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AdCampaign {
    #[sea_orm(iden = "ad_campaigns")]
    Table,
    Id,
    Title,
    ClerkUserId,
    IsActive,
    CompanyId,
    Created,
    Updated,
}
