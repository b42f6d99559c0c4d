//! Filter word entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Filter word entity. Unique per owner, like keywords.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "filters")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Filter word text.
    pub word: String,

    /// External identity of the owning user.
    pub clerk_user_id: String,

    /// When the row was created.
    pub created: DateTimeWithTimeZone,

    /// When the row was last updated.
    pub updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::company_filter::Entity")]
    CompanyFilter,
    #[sea_orm(has_many = "super::ad_campaign_filter::Entity")]
    AdCampaignFilter,
    #[sea_orm(has_many = "super::ad_group_filter::Entity")]
    AdGroupFilter,
}

impl ActiveModelBehavior for ActiveModel {}
