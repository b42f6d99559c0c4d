//! Ad campaign entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Ad campaign entity. Middle level of the campaign hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ad_campaigns")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display title.
    pub title: String,

    /// External identity of the owning user.
    pub clerk_user_id: String,

    /// Whether this campaign counts toward the owner's active cap.
    pub is_active: bool,

    /// Parent company, if any.
    pub company_id: Option<i32>,

    /// When the row was created.
    pub created: DateTimeWithTimeZone,

    /// When the row was last updated.
    pub updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::company::Entity",
        from = "Column::CompanyId",
        to = "super::company::Column::Id",
        on_delete = "Cascade"
    )]
    Company,
    #[sea_orm(has_many = "super::ad_group::Entity")]
    AdGroup,
    #[sea_orm(has_many = "super::ad_campaign_keyword::Entity")]
    AdCampaignKeyword,
    #[sea_orm(has_many = "super::ad_campaign_filter::Entity")]
    AdCampaignFilter,
}

impl Related<super::company::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Company.def()
    }
}

impl Related<super::ad_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
