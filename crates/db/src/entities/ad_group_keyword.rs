//! Ad group-keyword junction entity.

use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Junction row attaching a keyword to an ad group, with six independent
/// match-type flags. Unique per (group, keyword).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "ad_group_keyword")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub ad_group_id: i32,
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
        belongs_to = "super::ad_group::Entity",
        from = "Column::AdGroupId",
        to = "super::ad_group::Column::Id",
        on_delete = "Cascade"
    )]
    AdGroup,
    #[sea_orm(
        belongs_to = "super::keyword::Entity",
        from = "Column::KeywordId",
        to = "super::keyword::Column::Id",
        on_delete = "Cascade"
    )]
    Keyword,
}

impl Related<super::ad_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdGroup.def()
    }
}

impl Related<super::keyword::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Keyword.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
