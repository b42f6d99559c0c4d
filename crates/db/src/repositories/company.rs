//! Company repository.

use std::sync::Arc;

use crate::entities::{Company, company};
use crate::repositories::{PageRequest, SortOrder};
use kplanner_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};
use serde::Deserialize;

/// Sortable columns for company listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanySortBy {
    Id,
    Title,
    IsActive,
    #[default]
    Created,
    Updated,
}

impl CompanySortBy {
    const fn column(self) -> company::Column {
        match self {
            Self::Id => company::Column::Id,
            Self::Title => company::Column::Title,
            Self::IsActive => company::Column::IsActive,
            Self::Created => company::Column::Created,
            Self::Updated => company::Column::Updated,
        }
    }
}

/// Filters for company listings. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct CompanyListQuery {
    /// Case-insensitive substring match on title.
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub created_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub created_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub sort_by: CompanySortBy,
    pub sort_order: SortOrder,
}

/// Company repository for database operations.
#[derive(Clone)]
pub struct CompanyRepository {
    db: Arc<DatabaseConnection>,
}

impl CompanyRepository {
    /// Create a new company repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a company by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<company::Model>> {
        Company::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a company by ID, scoped to an owner.
    pub async fn find_owned(&self, id: i32, owner: &str) -> AppResult<Option<company::Model>> {
        Company::find_by_id(id)
            .filter(company::Column::ClerkUserId.eq(owner))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an owned company by ID, returning an error if not found.
    pub async fn get_owned(&self, id: i32, owner: &str) -> AppResult<company::Model> {
        self.find_owned(id, owner)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Company {id} not found")))
    }

    /// Create a new company.
    pub async fn create(&self, model: company::ActiveModel) -> AppResult<company::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a company.
    pub async fn update(&self, model: company::ActiveModel) -> AppResult<company::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count the owner's active companies.
    pub async fn count_active(&self, owner: &str) -> AppResult<u64> {
        Company::find()
            .filter(company::Column::ClerkUserId.eq(owner))
            .filter(company::Column::IsActive.eq(true))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// IDs of the owner's active companies.
    pub async fn active_ids(&self, owner: &str) -> AppResult<Vec<i32>> {
        let rows = Company::find()
            .filter(company::Column::ClerkUserId.eq(owner))
            .filter(company::Column::IsActive.eq(true))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows.into_iter().map(|m| m.id).collect())
    }

    /// List the owner's companies, filtered and paginated.
    ///
    /// Returns the page items and the total number of matching rows.
    pub async fn list(
        &self,
        owner: &str,
        query: &CompanyListQuery,
        page: PageRequest,
    ) -> AppResult<(Vec<company::Model>, u64)> {
        let mut select = Company::find().filter(company::Column::ClerkUserId.eq(owner));

        if let Some(search) = &query.search {
            select = select.filter(Expr::col(company::Column::Title).ilike(format!("%{search}%")));
        }
        if let Some(is_active) = query.is_active {
            select = select.filter(company::Column::IsActive.eq(is_active));
        }
        if let Some(after) = query.created_after {
            select = select.filter(company::Column::Created.gte(after));
        }
        if let Some(before) = query.created_before {
            select = select.filter(company::Column::Created.lte(before));
        }
        if let Some(after) = query.updated_after {
            select = select.filter(company::Column::Updated.gte(after));
        }
        if let Some(before) = query.updated_before {
            select = select.filter(company::Column::Updated.lte(before));
        }

        let column = query.sort_by.column();
        select = match query.sort_order {
            SortOrder::Asc => select.order_by_asc(column),
            SortOrder::Desc => select.order_by_desc(column),
        };
        // Stable tiebreak for equal sort keys
        select = select.order_by_asc(company::Column::Id);

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

    /// Delete the owner's companies by ID, in batches.
    ///
    /// IDs not owned by `owner` are silently skipped. Returns the number of
    /// rows actually deleted.
    pub async fn bulk_delete(&self, owner: &str, ids: &[i32], batch_size: usize) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in ids.chunks(batch_size.max(1)) {
            let result = Company::delete_many()
                .filter(company::Column::ClerkUserId.eq(owner))
                .filter(company::Column::Id.is_in(chunk.iter().copied()))
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

    fn company_model(id: i32, owner: &str) -> company::Model {
        let now = chrono::Utc::now().fixed_offset();
        company::Model {
            id,
            title: format!("Company {id}"),
            clerk_user_id: owner.to_string(),
            is_active: false,
            created: now,
            updated: now,
        }
    }

    #[tokio::test]
    async fn test_find_owned_returns_match() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![company_model(1, "user_a")]])
            .into_connection();
        let repo = CompanyRepository::new(Arc::new(db));

        let found = repo.find_owned(1, "user_a").await.unwrap();
        assert_eq!(found.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_get_owned_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<company::Model>::new()])
            .into_connection();
        let repo = CompanyRepository::new(Arc::new(db));

        let err = repo.get_owned(99, "user_a").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_with_search_filters_by_ilike() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![std::collections::BTreeMap::from([(
                "num_items",
                sea_orm::Value::BigInt(Some(1)),
            )])]])
            .append_query_results([vec![company_model(1, "user_a")]])
            .into_connection();
        let conn = Arc::new(db);
        let repo = CompanyRepository::new(Arc::clone(&conn));

        let query = CompanyListQuery {
            search: Some("acme".to_string()),
            ..Default::default()
        };
        let page = PageRequest {
            page: 1,
            page_size: 50,
        };
        let (items, total) = repo.list("user_a", &query, page).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(items.len(), 1);

        drop(repo);
        let log = Arc::try_unwrap(conn).unwrap().into_transaction_log();
        assert!(format!("{log:?}").contains("ILIKE"));
    }

    #[tokio::test]
    async fn test_bulk_delete_batches() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
            ])
            .into_connection();
        let repo = CompanyRepository::new(Arc::new(db));

        let deleted = repo.bulk_delete("user_a", &[1, 2, 3], 2).await.unwrap();
        assert_eq!(deleted, 3);
    }
}
