//! Ad campaign repository.

use std::sync::Arc;

use crate::entities::{AdCampaign, ad_campaign};
use crate::repositories::{PageRequest, SortOrder};
use kplanner_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;

/// Sortable columns for ad campaign listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdCampaignSortBy {
    Id,
    Title,
    IsActive,
    CompanyId,
    #[default]
    Created,
    Updated,
}

impl AdCampaignSortBy {
    const fn column(self) -> ad_campaign::Column {
        match self {
            Self::Id => ad_campaign::Column::Id,
            Self::Title => ad_campaign::Column::Title,
            Self::IsActive => ad_campaign::Column::IsActive,
            Self::CompanyId => ad_campaign::Column::CompanyId,
            Self::Created => ad_campaign::Column::Created,
            Self::Updated => ad_campaign::Column::Updated,
        }
    }
}

/// Filters for ad campaign listings. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct AdCampaignListQuery {
    /// Case-insensitive substring match on title.
    pub search: Option<String>,
    pub is_active: Option<bool>,
    /// Restrict to campaigns under one company.
    pub company_id: Option<i32>,
    pub created_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub created_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub sort_by: AdCampaignSortBy,
    pub sort_order: SortOrder,
}

/// Ad campaign repository for database operations.
#[derive(Clone)]
pub struct AdCampaignRepository {
    db: Arc<DatabaseConnection>,
}

impl AdCampaignRepository {
    /// Create a new ad campaign repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a campaign by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<ad_campaign::Model>> {
        AdCampaign::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a campaign by ID, scoped to an owner.
    pub async fn find_owned(&self, id: i32, owner: &str) -> AppResult<Option<ad_campaign::Model>> {
        AdCampaign::find_by_id(id)
            .filter(ad_campaign::Column::ClerkUserId.eq(owner))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an owned campaign by ID, returning an error if not found.
    pub async fn get_owned(&self, id: i32, owner: &str) -> AppResult<ad_campaign::Model> {
        self.find_owned(id, owner)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Ad campaign {id} not found")))
    }

    /// Create a new campaign.
    pub async fn create(&self, model: ad_campaign::ActiveModel) -> AppResult<ad_campaign::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a campaign.
    pub async fn update(&self, model: ad_campaign::ActiveModel) -> AppResult<ad_campaign::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the owner's active campaigns.
    pub async fn count_active(&self, owner: &str) -> AppResult<u64> {
        AdCampaign::find()
            .filter(ad_campaign::Column::ClerkUserId.eq(owner))
            .filter(ad_campaign::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the owner's active campaigns.
    pub async fn active_ids(&self, owner: &str) -> AppResult<Vec<i32>> {
        let rows = AdCampaign::find()
            .filter(ad_campaign::Column::ClerkUserId.eq(owner))
            .filter(ad_campaign::Column::IsActive.eq(true))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|m| m.id).collect())
    }

    /// List the owner's campaigns, filtered and paginated.
    ///
    /// Returns the page items and the total number of matching rows.
    pub async fn list(
        &self,
        owner: &str,
        query: &AdCampaignListQuery,
        page: PageRequest,
    ) -> AppResult<(Vec<ad_campaign::Model>, u64)> {
        let mut select = AdCampaign::find().filter(ad_campaign::Column::ClerkUserId.eq(owner));

        if let Some(search) = &query.search {
            select =
                select.filter(Expr::col(ad_campaign::Column::Title).ilike(format!("%{search}%")));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(ad_campaign::Column::IsActive.eq(is_active));
        }
        if let Some(company_id) = query.company_id {
            select = select.filter(ad_campaign::Column::CompanyId.eq(company_id));
        }
        if let Some(after) = query.created_after {
            select = select.filter(ad_campaign::Column::Created.gte(after));
        }
        if let Some(before) = query.created_before {
            select = select.filter(ad_campaign::Column::Created.lte(before));
        }
        if let Some(after) = query.updated_after {
            select = select.filter(ad_campaign::Column::Updated.gte(after));
        }
        if let Some(before) = query.updated_before {
            select = select.filter(ad_campaign::Column::Updated.lte(before));
        }

        let column = query.sort_by.column();
        select = match query.sort_order {
            SortOrder::Asc => select.order_by_asc(column),
            SortOrder::Desc => select.order_by_desc(column),
        };
        select = select.order_by_asc(ad_campaign::Column::Id);

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

    /// Delete the owner's campaigns by ID, in batches.
    ///
    /// IDs not owned by `owner` are silently skipped. Returns the number of
    /// rows actually deleted.
    pub async fn bulk_delete(&self, owner: &str, ids: &[i32], batch_size: usize) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in ids.chunks(batch_size.max(1)) {
            let result = AdCampaign::delete_many()
                .filter(ad_campaign::Column::ClerkUserId.eq(owner))
                .filter(ad_campaign::Column::Id.is_in(chunk.iter().copied()))
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
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn campaign_model(id: i32, owner: &str, company_id: Option<i32>) -> ad_campaign::Model {
        let now = chrono::Utc::now().fixed_offset();
        ad_campaign::Model {
            id,
            title: format!("Campaign {id}"),
            clerk_user_id: owner.to_string(),
            is_active: true,
            company_id,
            created: now,
            updated: now,
        }
    }

    #[tokio::test]
    async fn test_active_ids() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                campaign_model(3, "user_a", Some(1)),
                campaign_model(7, "user_a", None),
            ]])
            .into_connection();
        let repo = AdCampaignRepository::new(Arc::new(db));

        let ids = repo.active_ids("user_a").await.unwrap();
        assert_eq!(ids, vec![3, 7]);
    }

    #[tokio::test]
    async fn test_get_owned_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<ad_campaign::Model>::new()])
            .into_connection();
        let repo = AdCampaignRepository::new(Arc::new(db));

        let err = repo.get_owned(5, "user_b").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
