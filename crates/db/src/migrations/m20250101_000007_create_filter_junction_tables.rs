//! Create the three filter junction tables migration.
//!
//! Each junction carries a single is_negative flag and is unique per
//! (entity, filter). Both foreign keys cascade on delete.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_company_table::Company;
use super::m20250101_000002_create_ad_campaign_table::AdCampaign;
use super::m20250101_000003_create_ad_group_table::AdGroup;
use super::m20250101_000005_create_filter_table::Filter;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // company_filter
        manager
            .create_table(
                Table::create()
                    .table(CompanyFilter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyFilter::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompanyFilter::CompanyId).integer().not_null())
                    .col(ColumnDef::new(CompanyFilter::FilterId).integer().not_null())
                    .col(
                        ColumnDef::new(CompanyFilter::ClerkUserId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyFilter::IsNegative)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_filter_company")
                            .from(CompanyFilter::Table, CompanyFilter::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_filter_filter")
                            .from(CompanyFilter::Table, CompanyFilter::FilterId)
                            .to(Filter::Table, Filter::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_company_filter")
                    .table(CompanyFilter::Table)
                    .col(CompanyFilter::CompanyId)
                    .col(CompanyFilter::FilterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ad_campaign_filter
        manager
            .create_table(
                Table::create()
                    .table(AdCampaignFilter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdCampaignFilter::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdCampaignFilter::AdCampaignId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AdCampaignFilter::FilterId).integer().not_null())
                    .col(
                        ColumnDef::new(AdCampaignFilter::ClerkUserId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdCampaignFilter::IsNegative)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_campaign_filter_ad_campaign")
                            .from(AdCampaignFilter::Table, AdCampaignFilter::AdCampaignId)
                            .to(AdCampaign::Table, AdCampaign::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_campaign_filter_filter")
                            .from(AdCampaignFilter::Table, AdCampaignFilter::FilterId)
                            .to(Filter::Table, Filter::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_ad_campaign_filter")
                    .table(AdCampaignFilter::Table)
                    .col(AdCampaignFilter::AdCampaignId)
                    .col(AdCampaignFilter::FilterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ad_group_filter
        manager
            .create_table(
                Table::create()
                    .table(AdGroupFilter::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdGroupFilter::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdGroupFilter::AdGroupId).integer().not_null())
                    .col(ColumnDef::new(AdGroupFilter::FilterId).integer().not_null())
                    .col(
                        ColumnDef::new(AdGroupFilter::ClerkUserId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdGroupFilter::IsNegative)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_group_filter_ad_group")
                            .from(AdGroupFilter::Table, AdGroupFilter::AdGroupId)
                            .to(AdGroup::Table, AdGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_group_filter_filter")
                            .from(AdGroupFilter::Table, AdGroupFilter::FilterId)
                            .to(Filter::Table, Filter::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_ad_group_filter")
                    .table(AdGroupFilter::Table)
                    .col(AdGroupFilter::AdGroupId)
                    .col(AdGroupFilter::FilterId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdGroupFilter::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdCampaignFilter::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompanyFilter::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CompanyFilter {
    #[sea_orm(iden = "company_filter")]
    Table,
    Id,
    CompanyId,
    FilterId,
    ClerkUserId,
    IsNegative,
}

#[derive(DeriveIden)]
pub enum AdCampaignFilter {
    #[sea_orm(iden = "ad_campaign_filter")]
    Table,
    Id,
    AdCampaignId,
    FilterId,
    ClerkUserId,
    IsNegative,
}

#[derive(DeriveIden)]
pub enum AdGroupFilter {
    #[sea_orm(iden = "ad_group_filter")]
    Table,
    Id,
    AdGroupId,
    FilterId,
    ClerkUserId,
    IsNegative,
}
