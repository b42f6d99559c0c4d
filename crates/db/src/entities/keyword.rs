//! Keyword entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Keyword entity.
///
/// The keyword text is unique per owner; the same text used by two owners
/// produces two independent rows.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "keywords")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Keyword text.
    pub keyword: String,

    /// External identity of the owning user.
    pub clerk_user_id: String,

    /// When the row was created.
    pub created: DateTimeWithTimeZone,

    /// When the row was last updated.
    pub updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::company_keyword::Entity")]
    CompanyKeyword,
    #[sea_orm(has_many = "super::ad_campaign_keyword::Entity")]
    AdCampaignKeyword,
    #[sea_orm(has_many = "super::ad_group_keyword::Entity")]
    AdGroupKeyword,
}

impl ActiveModelBehavior for ActiveModel {}
