//! Ad group-filter junction entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Junction row attaching a filter word to an ad group.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ad_group_filter")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub ad_group_id: i32,
    pub filter_id: i32,

    /// External identity of the owning user.
    pub clerk_user_id: String,

    /// Whether the word acts as a negative filter for this group.
    pub is_negative: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ad_group::Entity",
        from = "Column::AdGroupId",
        to = "super::ad_group::Column::Id",
        on_delete = "Cascade"
    )]
    AdGroup,
    #[sea_orm(
        belongs_to = "super::filter::Entity",
        from = "Column::FilterId",
        to = "super::filter::Column::Id",
        on_delete = "Cascade"
    )]
    Filter,
}

impl Related<super::ad_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdGroup.def()
    }
}

impl Related<super::filter::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Filter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
