//! Filter word repository.
//!
//! Mirrors the keyword repository with a single `is_negative` flag on the
//! junction rows instead of the six match types.

use std::sync::Arc;

use crate::entities::{
    AdCampaignFilter, AdGroupFilter, CompanyFilter, Filter, ad_campaign_filter, ad_group_filter,
    company_filter, filter,
};
use crate::repositories::keyword::{BulkOutcome, RelationTargets};
use crate::repositories::{PageRequest, SortOrder};
use kplanner_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::Deserialize;

/// Sortable columns for filter listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterSortBy {
    Id,
    Word,
    #[default]
    Created,
    Updated,
}

impl FilterSortBy {
    const fn column(self) -> filter::Column {
        match self {
            Self::Id => filter::Column::Id,
            Self::Word => filter::Column::Word,
            Self::Created => filter::Column::Created,
            Self::Updated => filter::Column::Updated,
        }
    }
}

/// Filters for filter word listings. All fields combine with AND.
#[derive(Debug, Clone, Default)]
pub struct FilterListQuery {
    /// Case-insensitive substring match on the word.
    pub search: Option<String>,
    pub created_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub created_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub sort_by: FilterSortBy,
    pub sort_order: SortOrder,
}

enum LinkChange {
    Created,
    Updated,
    Unchanged,
}

impl BulkOutcome {
    fn record_filter(&mut self, change: &LinkChange) {
        match change {
            LinkChange::Created => self.relations_created += 1,
            LinkChange::Updated => self.relations_updated += 1,
            LinkChange::Unchanged => {}
        }
    }
}

/// Filter word repository for database operations.
#[derive(Clone)]
pub struct FilterRepository {
    db: Arc<DatabaseConnection>,
}

impl FilterRepository {
    /// Create a new filter repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a filter word by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<filter::Model>> {
        Filter::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a filter word by ID, scoped to an owner.
    pub async fn find_owned(&self, id: i32, owner: &str) -> AppResult<Option<filter::Model>> {
        Filter::find_by_id(id)
            .filter(filter::Column::ClerkUserId.eq(owner))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an owned filter word by ID, returning an error if not found.
    pub async fn get_owned(&self, id: i32, owner: &str) -> AppResult<filter::Model> {
        self.find_owned(id, owner)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Filter {id} not found")))
    }

    /// Find a filter word by exact text within an owner's namespace.
    pub async fn find_by_word(&self, owner: &str, word: &str) -> AppResult<Option<filter::Model>> {
        Filter::find()
            .filter(filter::Column::ClerkUserId.eq(owner))
            .filter(filter::Column::Word.eq(word))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the owner's filter words among the given IDs.
    pub async fn find_owned_many(&self, owner: &str, ids: &[i32]) -> AppResult<Vec<filter::Model>> {
        Filter::find()
            .filter(filter::Column::ClerkUserId.eq(owner))
            .filter(filter::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a filter word.
    pub async fn update(&self, model: filter::ActiveModel) -> AppResult<filter::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List the owner's filter words, filtered and paginated.
    ///
    /// Returns the page items and the total number of matching rows.
    pub async fn list(
        &self,
        owner: &str,
        query: &FilterListQuery,
        page: PageRequest,
    ) -> AppResult<(Vec<filter::Model>, u64)> {
        let mut select = Filter::find().filter(filter::Column::ClerkUserId.eq(owner));

        if let Some(search) = &query.search {
            select = select.filter(Expr::col(filter::Column::Word).ilike(format!("%{search}%")));
        }
        if let Some(after) = query.created_after {
            select = select.filter(filter::Column::Created.gte(after));
        }
        if let Some(before) = query.created_before {
            select = select.filter(filter::Column::Created.lte(before));
        }
        if let Some(after) = query.updated_after {
            select = select.filter(filter::Column::Updated.gte(after));
        }
        if let Some(before) = query.updated_before {
            select = select.filter(filter::Column::Updated.lte(before));
        }

        let column = query.sort_by.column();
        select = match query.sort_order {
            SortOrder::Asc => select.order_by_asc(column),
            SortOrder::Desc => select.order_by_desc(column),
        };
        select = select.order_by_asc(filter::Column::Id);

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

    /// Delete the owner's filter words by ID, in batches. Junction rows
    /// follow via cascade.
    pub async fn bulk_delete(&self, owner: &str, ids: &[i32], batch_size: usize) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in ids.chunks(batch_size.max(1)) {
            let result = Filter::delete_many()
                .filter(filter::Column::ClerkUserId.eq(owner))
                .filter(filter::Column::Id.is_in(chunk.iter().copied()))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted += result.rows_affected;
        }
        Ok(deleted)
    }

    // === Junction deletes ===

    /// Delete the owner's company-filter junction rows by junction ID.
    pub async fn delete_company_links(
        &self,
        owner: &str,
        link_ids: &[i32],
        batch_size: usize,
    ) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in link_ids.chunks(batch_size.max(1)) {
            let result = CompanyFilter::delete_many()
                .filter(company_filter::Column::ClerkUserId.eq(owner))
                .filter(company_filter::Column::Id.is_in(chunk.iter().copied()))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted += result.rows_affected;
        }
        Ok(deleted)
    }

    /// Delete the owner's campaign-filter junction rows by junction ID.
    pub async fn delete_ad_campaign_links(
        &self,
        owner: &str,
        link_ids: &[i32],
        batch_size: usize,
    ) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in link_ids.chunks(batch_size.max(1)) {
            let result = AdCampaignFilter::delete_many()
                .filter(ad_campaign_filter::Column::ClerkUserId.eq(owner))
                .filter(ad_campaign_filter::Column::Id.is_in(chunk.iter().copied()))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted += result.rows_affected;
        }
        Ok(deleted)
    }

    /// Delete the owner's group-filter junction rows by junction ID.
    pub async fn delete_ad_group_links(
        &self,
        owner: &str,
        link_ids: &[i32],
        batch_size: usize,
    ) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in link_ids.chunks(batch_size.max(1)) {
            let result = AdGroupFilter::delete_many()
                .filter(ad_group_filter::Column::ClerkUserId.eq(owner))
                .filter(ad_group_filter::Column::Id.is_in(chunk.iter().copied()))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted += result.rows_affected;
        }
        Ok(deleted)
    }

    // === Bulk attachment ===

    /// Attach a batch of filter words to the target entities.
    ///
    /// Same shape as keyword attachment: trim, skip empties, reuse or create
    /// the word row per owner, then fan the association out. Existing
    /// junction rows change `is_negative` only when `override_is_negative`
    /// is set. Runs in one transaction.
    pub async fn attach_batch(
        &self,
        owner: &str,
        words: &[String],
        targets: &RelationTargets,
        is_negative: bool,
        override_is_negative: bool,
    ) -> AppResult<BulkOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut outcome = BulkOutcome::default();
        for word in words {
            let trimmed = word.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (f, created) = Self::find_or_create_filter(&txn, owner, trimmed)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            if created {
                outcome.created += 1;
            } else {
                outcome.existing += 1;
            }

            Self::fan_out(
                &txn,
                owner,
                f.id,
                targets,
                is_negative,
                override_is_negative,
                &mut outcome,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(outcome)
    }

    /// Attach existing filter words (by ID) to the target entities.
    pub async fn attach_existing_batch(
        &self,
        owner: &str,
        filter_ids: &[i32],
        targets: &RelationTargets,
        is_negative: bool,
        override_is_negative: bool,
    ) -> AppResult<BulkOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut outcome = BulkOutcome::default();
        for &filter_id in filter_ids {
            Self::fan_out(
                &txn,
                owner,
                filter_id,
                targets,
                is_negative,
                override_is_negative,
                &mut outcome,
            )
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(outcome)
    }

    /// Update every existing junction row of the given filter words across
    /// all three levels.
    ///
    /// Returns the number of junction rows whose `is_negative` actually
    /// changed. No-op unless `override_is_negative` is set.
    pub async fn update_relations(
        &self,
        owner: &str,
        filter_ids: &[i32],
        is_negative: bool,
        override_is_negative: bool,
    ) -> AppResult<u64> {
        if !override_is_negative {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut updated = 0;

        let rows = CompanyFilter::find()
            .filter(company_filter::Column::ClerkUserId.eq(owner))
            .filter(company_filter::Column::FilterId.is_in(filter_ids.iter().copied()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        for row in rows {
            if row.is_negative != is_negative {
                let mut am = row.into_active_model();
                am.is_negative = Set(is_negative);
                am.update(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                updated += 1;
            }
        }

        let rows = AdCampaignFilter::find()
            .filter(ad_campaign_filter::Column::ClerkUserId.eq(owner))
            .filter(ad_campaign_filter::Column::FilterId.is_in(filter_ids.iter().copied()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        for row in rows {
            if row.is_negative != is_negative {
                let mut am = row.into_active_model();
                am.is_negative = Set(is_negative);
                am.update(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                updated += 1;
            }
        }

        let rows = AdGroupFilter::find()
            .filter(ad_group_filter::Column::ClerkUserId.eq(owner))
            .filter(ad_group_filter::Column::FilterId.is_in(filter_ids.iter().copied()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        for row in rows {
            if row.is_negative != is_negative {
                let mut am = row.into_active_model();
                am.is_negative = Set(is_negative);
                am.update(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                updated += 1;
            }
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(updated)
    }

    // === Internals ===

    async fn find_or_create_filter<C: ConnectionTrait>(
        conn: &C,
        owner: &str,
        word: &str,
    ) -> Result<(filter::Model, bool), DbErr> {
        let existing = Filter::find()
            .filter(filter::Column::ClerkUserId.eq(owner))
            .filter(filter::Column::Word.eq(word))
            .one(conn)
            .await?;

        if let Some(f) = existing {
            return Ok((f, false));
        }

        let model = filter::ActiveModel {
            word: Set(word.to_string()),
            clerk_user_id: Set(owner.to_string()),
            ..Default::default()
        }
        .insert(conn)
        .await?;

        Ok((model, true))
    }

    async fn fan_out<C: ConnectionTrait>(
        conn: &C,
        owner: &str,
        filter_id: i32,
        targets: &RelationTargets,
        is_negative: bool,
        override_is_negative: bool,
        outcome: &mut BulkOutcome,
    ) -> Result<(), DbErr> {
        for &company_id in &targets.company_ids {
            let change = Self::upsert_company_link(
                conn,
                owner,
                company_id,
                filter_id,
                is_negative,
                override_is_negative,
            )
            .await?;
            outcome.record_filter(&change);
        }
        for &ad_campaign_id in &targets.ad_campaign_ids {
            let change = Self::upsert_ad_campaign_link(
                conn,
                owner,
                ad_campaign_id,
                filter_id,
                is_negative,
                override_is_negative,
            )
            .await?;
            outcome.record_filter(&change);
        }
        for &ad_group_id in &targets.ad_group_ids {
            let change = Self::upsert_ad_group_link(
                conn,
                owner,
                ad_group_id,
                filter_id,
                is_negative,
                override_is_negative,
            )
            .await?;
            outcome.record_filter(&change);
        }
        Ok(())
    }

    async fn upsert_company_link<C: ConnectionTrait>(
        conn: &C,
        owner: &str,
        company_id: i32,
        filter_id: i32,
        is_negative: bool,
        override_is_negative: bool,
    ) -> Result<LinkChange, DbErr> {
        let existing = CompanyFilter::find()
            .filter(company_filter::Column::CompanyId.eq(company_id))
            .filter(company_filter::Column::FilterId.eq(filter_id))
            .one(conn)
            .await?;

        match existing {
            Some(row) => {
                if override_is_negative && row.is_negative != is_negative {
                    let mut am = row.into_active_model();
                    am.is_negative = Set(is_negative);
                    am.update(conn).await?;
                    Ok(LinkChange::Updated)
                } else {
                    Ok(LinkChange::Unchanged)
                }
            }
            None => {
                company_filter::ActiveModel {
                    company_id: Set(company_id),
                    filter_id: Set(filter_id),
                    clerk_user_id: Set(owner.to_string()),
                    is_negative: Set(is_negative),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                Ok(LinkChange::Created)
            }
        }
    }

    async fn upsert_ad_campaign_link<C: ConnectionTrait>(
        conn: &C,
        owner: &str,
        ad_campaign_id: i32,
        filter_id: i32,
        is_negative: bool,
        override_is_negative: bool,
    ) -> Result<LinkChange, DbErr> {
        let existing = AdCampaignFilter::find()
            .filter(ad_campaign_filter::Column::AdCampaignId.eq(ad_campaign_id))
            .filter(ad_campaign_filter::Column::FilterId.eq(filter_id))
            .one(conn)
            .await?;

        match existing {
            Some(row) => {
                if override_is_negative && row.is_negative != is_negative {
                    let mut am = row.into_active_model();
                    am.is_negative = Set(is_negative);
                    am.update(conn).await?;
                    Ok(LinkChange::Updated)
                } else {
                    Ok(LinkChange::Unchanged)
                }
            }
            None => {
                ad_campaign_filter::ActiveModel {
                    ad_campaign_id: Set(ad_campaign_id),
                    filter_id: Set(filter_id),
                    clerk_user_id: Set(owner.to_string()),
                    is_negative: Set(is_negative),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                Ok(LinkChange::Created)
            }
        }
    }

    async fn upsert_ad_group_link<C: ConnectionTrait>(
        conn: &C,
        owner: &str,
        ad_group_id: i32,
        filter_id: i32,
        is_negative: bool,
        override_is_negative: bool,
    ) -> Result<LinkChange, DbErr> {
        let existing = AdGroupFilter::find()
            .filter(ad_group_filter::Column::AdGroupId.eq(ad_group_id))
            .filter(ad_group_filter::Column::FilterId.eq(filter_id))
            .one(conn)
            .await?;

        match existing {
            Some(row) => {
                if override_is_negative && row.is_negative != is_negative {
                    let mut am = row.into_active_model();
                    am.is_negative = Set(is_negative);
                    am.update(conn).await?;
                    Ok(LinkChange::Updated)
                } else {
                    Ok(LinkChange::Unchanged)
                }
            }
            None => {
                ad_group_filter::ActiveModel {
                    ad_group_id: Set(ad_group_id),
                    filter_id: Set(filter_id),
                    clerk_user_id: Set(owner.to_string()),
                    is_negative: Set(is_negative),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                Ok(LinkChange::Created)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn filter_model(id: i32, word: &str, owner: &str) -> filter::Model {
        let now = chrono::Utc::now().fixed_offset();
        filter::Model {
            id,
            word: word.to_string(),
            clerk_user_id: owner.to_string(),
            created: now,
            updated: now,
        }
    }

    #[tokio::test]
    async fn test_find_by_word() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![filter_model(1, "free", "user_a")]])
            .into_connection();
        let repo = FilterRepository::new(Arc::new(db));

        let found = repo.find_by_word("user_a", "free").await.unwrap();
        assert_eq!(found.unwrap().word, "free");
    }

    #[tokio::test]
    async fn test_update_relations_without_override_is_noop() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = FilterRepository::new(Arc::new(db));

        let updated = repo
            .update_relations("user_a", &[1, 2], true, false)
            .await
            .unwrap();
        assert_eq!(updated, 0);
    }

    #[tokio::test]
    async fn test_delete_ad_group_links() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 2,
            }])
            .into_connection();
        let repo = FilterRepository::new(Arc::new(db));

        let deleted = repo
            .delete_ad_group_links("user_a", &[7, 8], 25)
            .await
            .unwrap();
        assert_eq!(deleted, 2);
    }
}
