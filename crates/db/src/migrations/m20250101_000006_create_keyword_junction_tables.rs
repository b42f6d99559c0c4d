//! Create the three keyword junction tables migration.
//!
//! Each junction carries the six independent match-type flags and is unique
//! per (entity, keyword). Both foreign keys cascade on delete so junction
//! rows never outlive either side.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_company_table::Company;
use super::m20250101_000002_create_ad_campaign_table::AdCampaign;
use super::m20250101_000003_create_ad_group_table::AdGroup;
use super::m20250101_000004_create_keyword_table::Keyword;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // company_keyword
        manager
            .create_table(
                Table::create()
                    .table(CompanyKeyword::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompanyKeyword::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompanyKeyword::CompanyId).integer().not_null())
                    .col(ColumnDef::new(CompanyKeyword::KeywordId).integer().not_null())
                    .col(
                        ColumnDef::new(CompanyKeyword::ClerkUserId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompanyKeyword::Broad)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CompanyKeyword::Phrase)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CompanyKeyword::Exact)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CompanyKeyword::NegBroad)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CompanyKeyword::NegPhrase)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CompanyKeyword::NegExact)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_keyword_company")
                            .from(CompanyKeyword::Table, CompanyKeyword::CompanyId)
                            .to(Company::Table, Company::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_company_keyword_keyword")
                            .from(CompanyKeyword::Table, CompanyKeyword::KeywordId)
                            .to(Keyword::Table, Keyword::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_company_keyword")
                    .table(CompanyKeyword::Table)
                    .col(CompanyKeyword::CompanyId)
                    .col(CompanyKeyword::KeywordId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_company_keyword_clerk_user_id")
                    .table(CompanyKeyword::Table)
                    .col(CompanyKeyword::ClerkUserId)
                    .to_owned(),
            )
            .await?;

        // ad_campaign_keyword
        manager
            .create_table(
                Table::create()
                    .table(AdCampaignKeyword::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdCampaignKeyword::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AdCampaignKeyword::AdCampaignId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdCampaignKeyword::KeywordId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdCampaignKeyword::ClerkUserId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdCampaignKeyword::Broad)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdCampaignKeyword::Phrase)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdCampaignKeyword::Exact)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdCampaignKeyword::NegBroad)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdCampaignKeyword::NegPhrase)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdCampaignKeyword::NegExact)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_campaign_keyword_ad_campaign")
                            .from(AdCampaignKeyword::Table, AdCampaignKeyword::AdCampaignId)
                            .to(AdCampaign::Table, AdCampaign::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_campaign_keyword_keyword")
                            .from(AdCampaignKeyword::Table, AdCampaignKeyword::KeywordId)
                            .to(Keyword::Table, Keyword::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_ad_campaign_keyword")
                    .table(AdCampaignKeyword::Table)
                    .col(AdCampaignKeyword::AdCampaignId)
                    .col(AdCampaignKeyword::KeywordId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ad_campaign_keyword_clerk_user_id")
                    .table(AdCampaignKeyword::Table)
                    .col(AdCampaignKeyword::ClerkUserId)
                    .to_owned(),
            )
            .await?;

        // ad_group_keyword
        manager
            .create_table(
                Table::create()
                    .table(AdGroupKeyword::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AdGroupKeyword::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(AdGroupKeyword::AdGroupId).integer().not_null())
                    .col(ColumnDef::new(AdGroupKeyword::KeywordId).integer().not_null())
                    .col(
                        ColumnDef::new(AdGroupKeyword::ClerkUserId)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AdGroupKeyword::Broad)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdGroupKeyword::Phrase)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdGroupKeyword::Exact)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdGroupKeyword::NegBroad)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdGroupKeyword::NegPhrase)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(AdGroupKeyword::NegExact)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_group_keyword_ad_group")
                            .from(AdGroupKeyword::Table, AdGroupKeyword::AdGroupId)
                            .to(AdGroup::Table, AdGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ad_group_keyword_keyword")
                            .from(AdGroupKeyword::Table, AdGroupKeyword::KeywordId)
                            .to(Keyword::Table, Keyword::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("unique_ad_group_keyword")
                    .table(AdGroupKeyword::Table)
                    .col(AdGroupKeyword::AdGroupId)
                    .col(AdGroupKeyword::KeywordId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ad_group_keyword_clerk_user_id")
                    .table(AdGroupKeyword::Table)
                    .col(AdGroupKeyword::ClerkUserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdGroupKeyword::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AdCampaignKeyword::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompanyKeyword::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CompanyKeyword {
    #[sea_orm(iden = "company_keyword")]
    Table,
    Id,
    CompanyId,
    KeywordId,
    ClerkUserId,
    Broad,
    Phrase,
    Exact,
    NegBroad,
    NegPhrase,
    NegExact,
}

#[derive(DeriveIden)]
pub enum AdCampaignKeyword {
    #[sea_orm(iden = "ad_campaign_keyword")]
    Table,
    Id,
    AdCampaignId,
    KeywordId,
    ClerkUserId,
    Broad,
    Phrase,
    Exact,
    NegBroad,
    NegPhrase,
    NegExact,
}

#[derive(DeriveIden)]
pub enum AdGroupKeyword {
    #[sea_orm(iden = "ad_group_keyword")]
    Table,
    Id,
    AdGroupId,
    KeywordId,
    ClerkUserId,
    Broad,
    Phrase,
    Exact,
    NegBroad,
    NegPhrase,
    NegExact,
}
