//! Ad campaign-filter junction entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Junction row attaching a filter word to an ad campaign.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ad_campaign_filter")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub ad_campaign_id: i32,
    pub filter_id: i32,

    /// External identity of the owning user.
    pub clerk_user_id: String,

    /// Whether the word acts as a negative filter for this campaign.
    pub is_negative: bool,
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
    #[sea_orm(
        belongs_to = "super::filter::Entity",
        from = "Column::FilterId",
        to = "super::filter::Column::Id",
        on_delete = "Cascade"
    )]
    Filter,
}

impl Related<super::ad_campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdCampaign.def()
    }
}

impl Related<super::filter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Filter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
