//! Ad campaign-keyword junction entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Junction row attaching a keyword to an ad campaign, with six independent
/// match-type flags. Unique per (campaign, keyword).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ad_campaign_keyword")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub ad_campaign_id: i32,
    pub keyword_id: i32,

    /// External identity of the owning user.
    pub clerk_user_id: String,

    pub broad: bool,
    pub phrase: bool,
    pub exact: bool,
    pub neg_broad: bool,
    pub neg_phrase: bool,
    pub neg_exact: bool,
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
        belongs_to = "super::keyword::Entity",
        from = "Column::KeywordId",
        to = "super::keyword::Column::Id",
        on_delete = "Cascade"
    )]
    Keyword,
}

impl Related<super::ad_campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdCampaign.def()
    }
}

impl Related<super::keyword::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Keyword.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
