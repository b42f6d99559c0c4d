//! Ad group entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Ad group entity. Bottom level of the campaign hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ad_groups")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display title.
    pub title: String,

    /// External identity of the owning user.
    pub clerk_user_id: String,

    /// Whether this group counts toward the owner's active cap.
    pub is_active: bool,

    /// Parent campaign, if any.
    pub ad_campaign_id: Option<i32>,

    /// When the row was created.
    pub created: DateTimeWithTimeZone,

    /// When the row was last updated.
    pub updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ad_campaign::Entity",
        from = "Column::AdCampaignId",
        to = "super::ad_campaign::Column::Id",
        on_delete = "Cascade"
    )]
    AdCampaign,
    #[sea_orm(has_many = "super::ad_group_keyword::Entity")]
    AdGroupKeyword,
    #[sea_orm(has_many = "super::ad_group_filter::Entity")]
    AdGroupFilter,
}

impl Related<super::ad_campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdCampaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
