//! Company entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Company entity. Top level of the campaign hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display title.
    pub title: String,

    /// External identity of the owning user.
    pub clerk_user_id: String,

    /// Whether this company counts toward the owner's active cap.
    pub is_active: bool,

    /// When the row was created.
    pub created: DateTimeWithTimeZone,

    /// When the row was last updated.
    pub updated: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ad_campaign::Entity")]
    AdCampaign,
    #[sea_orm(has_many = "super::company_keyword::Entity")]
    CompanyKeyword,
    #[sea_orm(has_many = "super::company_filter::Entity")]
    CompanyFilter,
}

impl Related<super::ad_campaign::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdCampaign.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
