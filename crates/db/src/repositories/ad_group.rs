//! Ad group repository.

use std::sync::Arc;

use crate::entities::{AdGroup, ad_group};
use crate::repositories::{PageRequest, SortOrder};
use kplanner_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;

/// Sortable columns for ad group listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdGroupSortBy {
    Id,
    Title,
    IsActive,
    AdCampaignId,
    #[default]
    Created,
    Updated,
}

impl AdGroupSortBy {
    const fn column(self) -> ad_group::Column {
        match self {
            Self::Id => ad_group::Column::Id,
            Self::Title => ad_group::Column::Title,
            Self::IsActive => ad_group::Column::IsActive,
            Self::AdCampaignId => ad_group::Column::AdCampaignId,
            Self::Created => ad_group::Column::Created,
            Self::Updated => ad_group::Column::Updated,
        }
    }
}

/// Filters for ad group listings. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct AdGroupListQuery {
    /// Case-insensitive substring match on title.
    pub search: Option<String>,
    pub is_active: Option<bool>,
    /// Restrict to groups under one campaign.
    pub ad_campaign_id: Option<i32>,
    pub created_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub created_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub sort_by: AdGroupSortBy,
    pub sort_order: SortOrder,
}

/// Ad group repository for database operations.
#[derive(Clone)]
pub struct AdGroupRepository {
    db: Arc<DatabaseConnection>,
}

impl AdGroupRepository {
    /// Create a new ad group repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a group by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<ad_group::Model>> {
        AdGroup::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a group by ID, scoped to an owner.
    pub async fn find_owned(&self, id: i32, owner: &str) -> AppResult<Option<ad_group::Model>> {
        AdGroup::find_by_id(id)
            .filter(ad_group::Column::ClerkUserId.eq(owner))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an owned group by ID, returning an error if not found.
    pub async fn get_owned(&self, id: i32, owner: &str) -> AppResult<ad_group::Model> {
        self.find_owned(id, owner)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ad group {id} not found")))
    }

    /// Create a new group.
    pub async fn create(&self, model: ad_group::ActiveModel) -> AppResult<ad_group::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a group.
    pub async fn update(&self, model: ad_group::ActiveModel) -> AppResult<ad_group::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the owner's active groups.
    pub async fn count_active(&self, owner: &str) -> AppResult<u64> {
        AdGroup::find()
            .filter(ad_group::Column::ClerkUserId.eq(owner))
            .filter(ad_group::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the owner's active groups.
    pub async fn active_ids(&self, owner: &str) -> AppResult<Vec<i32>> {
        let rows = AdGroup::find()
            .filter(ad_group::Column::ClerkUserId.eq(owner))
            .filter(ad_group::Column::IsActive.eq(true))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|m| m.id).collect())
    }

    /// List the owner's groups, filtered and paginated.
    ///
    /// Returns the page items and the total number of matching rows.
    pub async fn list(
        &self,
        owner: &str,
        query: &AdGroupListQuery,
        page: PageRequest,
    ) -> AppResult<(Vec<ad_group::Model>, u64)> {
        let mut select = AdGroup::find().filter(ad_group::Column::ClerkUserId.eq(owner));

        if let Some(search) = &query.search {
            select = select.filter(Expr::col(ad_group::Column::Title).ilike(format!("%{search}%")));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(ad_group::Column::IsActive.eq(is_active));
        }
        if let Some(ad_campaign_id) = query.ad_campaign_id {
            select = select.filter(ad_group::Column::AdCampaignId.eq(ad_campaign_id));
        }
        if let Some(after) = query.created_after {
            select = select.filter(ad_group::Column::Created.gte(after));
        }
        if let Some(before) = query.created_before {
            select = select.filter(ad_group::Column::Created.lte(before));
        }
        if let Some(after) = query.updated_after {
            select = select.filter(ad_group::Column::Updated.gte(after));
        }
        if let Some(before) = query.updated_before {
            select = select.filter(ad_group::Column::Updated.lte(before));
        }

        let column = query.sort_by.column();
        select = match query.sort_order {
            SortOrder::Asc => select.order_by_asc(column),
            SortOrder::Desc => select.order_by_desc(column),
        };
        select = select.order_by_asc(ad_group::Column::Id);

        let paginator = select.paginate(self.db.as_ref(), page.page_size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        let items = paginator
            .fetch_page(page.index())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((items, total))
    }

    /// Delete the owner's groups by ID, in batches.
    ///
    /// IDs not owned by `owner` are silently skipped. Returns the number of
    /// rows actually deleted.
    pub async fn bulk_delete(&self, owner: &str, ids: &[i32], batch_size: usize) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in ids.chunks(batch_size.max(1)) {
            let result = AdGroup::delete_many()
                .filter(ad_group::Column::ClerkUserId.eq(owner))
                .filter(ad_group::Column::Id.is_in(chunk.iter().copied()))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted += result.rows_affected;
        }
        Ok(deleted)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn group_model(id: i32, owner: &str) -> ad_group::Model {
        let now = chrono::Utc::now().fixed_offset();
        ad_group::Model {
            id,
            title: format!("Group {id}"),
            clerk_user_id: owner.to_string(),
            is_active: false,
            ad_campaign_id: None,
            created: now,
            updated: now,
        }
    }

    #[tokio::test]
    async fn test_find_owned_returns_match() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![group_model(4, "user_a")]])
            .into_connection();
        let repo = AdGroupRepository::new(Arc::new(db));

        let found = repo.find_owned(4, "user_a").await.unwrap();
        assert_eq!(found.unwrap().id, 4);
    }

    #[tokio::test]
    async fn test_bulk_delete_single_batch() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();
        let repo = AdGroupRepository::new(Arc::new(db));

        let deleted = repo.bulk_delete("user_a", &[4, 5], 25).await.unwrap();
        assert_eq!(deleted, 2);
    }
}
