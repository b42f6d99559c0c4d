//! Filter word service.

use std::collections::HashSet;

use chrono::Utc;
use kplanner_common::config::LimitsConfig;
use kplanner_common::{AppError, AppResult};
use kplanner_db::entities::filter;
use kplanner_db::repositories::filter::FilterListQuery;
use kplanner_db::repositories::keyword::{BulkOutcome, RelationTargets};
use kplanner_db::repositories::{
    AdCampaignRepository, AdGroupRepository, CompanyRepository, FilterRepository, PageRequest,
};
use sea_orm::ActiveValue::Set;
use sea_orm::IntoActiveModel;

use crate::services::BulkDeleteOutcome;

/// Service for managing filter words and their entity relations.
#[derive(Clone)]
pub struct FilterService {
    repo: FilterRepository,
    company_repo: CompanyRepository,
    ad_campaign_repo: AdCampaignRepository,
    ad_group_repo: AdGroupRepository,
    limits: LimitsConfig,
}

impl FilterService {
    /// Create a new filter service.
    #[must_use]
    pub const fn new(
        repo: FilterRepository,
        company_repo: CompanyRepository,
        ad_campaign_repo: AdCampaignRepository,
        ad_group_repo: AdGroupRepository,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            repo,
            company_repo,
            ad_campaign_repo,
            ad_group_repo,
            limits,
        }
    }

    /// Get an owned filter word by ID.
    pub async fn get(&self, owner: &str, id: i32) -> AppResult<filter::Model> {
        self.repo.get_owned(id, owner).await
    }

    /// List the owner's filter words.
    pub async fn list(
        &self,
        owner: &str,
        query: &FilterListQuery,
        page: u64,
        page_size: Option<u64>,
    ) -> AppResult<(Vec<filter::Model>, u64, PageRequest)> {
        let page = PageRequest {
            page: page.max(1),
            page_size: page_size
                .unwrap_or(self.limits.page_size)
                .clamp(1, self.limits.max_page_size),
        };
        let (items, total) = self.repo.list(owner, query, page).await?;
        Ok((items, total, page))
    }

    /// Rename a filter word, keeping the per-owner uniqueness invariant.
    pub async fn update_word(&self, owner: &str, id: i32, word: &str) -> AppResult<filter::Model> {
        let trimmed = word.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "Filter word must not be empty".to_string(),
            ));
        }
        if trimmed.len() > 255 {
            return Err(AppError::Validation(
                "Filter word must be at most 255 characters".to_string(),
            ));
        }

        let current = self.repo.get_owned(id, owner).await?;

        if let Some(other) = self.repo.find_by_word(owner, trimmed).await?
            && other.id != current.id
        {
            return Err(AppError::Conflict(format!(
                "Filter word '{trimmed}' already exists"
            )));
        }

        let mut am = current.into_active_model();
        am.word = Set(trimmed.to_string());
        am.updated = Set(Utc::now().fixed_offset());
        self.repo.update(am).await
    }

    /// Bulk-create filter words and fan their associations out to the target
    /// entities.
    pub async fn bulk_create(
        &self,
        owner: &str,
        words: &[String],
        targets: &RelationTargets,
        is_negative: bool,
        override_is_negative: bool,
        batch_size: Option<u64>,
    ) -> AppResult<(BulkOutcome, u64)> {
        let batch_size = self.clamp_batch(batch_size);
        self.validate_targets(owner, targets).await?;

        let mut outcome = BulkOutcome::default();
        let mut batches = 0;
        for chunk in words.chunks(batch_size) {
            let batch = self
                .repo
                .attach_batch(owner, chunk, targets, is_negative, override_is_negative)
                .await?;
            outcome.merge(batch);
            batches += 1;
        }

        Ok((outcome, batches))
    }

    /// Fan existing filter words out to the target entities.
    pub async fn attach_relations(
        &self,
        owner: &str,
        filter_ids: &[i32],
        targets: &RelationTargets,
        is_negative: bool,
        override_is_negative: bool,
    ) -> AppResult<(BulkOutcome, u64)> {
        self.check_request_cap(filter_ids)?;
        self.check_filter_ownership(owner, filter_ids).await?;
        self.validate_targets(owner, targets).await?;

        let batch_size = self.clamp_batch(None);
        let mut outcome = BulkOutcome::default();
        let mut batches = 0;
        for chunk in filter_ids.chunks(batch_size) {
            let batch = self
                .repo
                .attach_existing_batch(owner, chunk, targets, is_negative, override_is_negative)
                .await?;
            outcome.merge(batch);
            batches += 1;
        }

        Ok((outcome, batches))
    }

    /// Update every existing junction row of the given filter words. Returns
    /// the number of rows whose `is_negative` actually changed.
    pub async fn update_relations(
        &self,
        owner: &str,
        filter_ids: &[i32],
        is_negative: bool,
        override_is_negative: bool,
    ) -> AppResult<u64> {
        self.check_request_cap(filter_ids)?;
        self.check_filter_ownership(owner, filter_ids).await?;
        self.repo
            .update_relations(owner, filter_ids, is_negative, override_is_negative)
            .await
    }

    /// Delete the owner's filter words by ID, in batches.
    pub async fn bulk_delete(&self, owner: &str, ids: &[i32]) -> AppResult<BulkDeleteOutcome> {
        let batch_size = self.limits.batch_size as usize;
        let deleted = self.repo.bulk_delete(owner, ids, batch_size).await?;
        Ok(BulkDeleteOutcome::new(deleted, ids.len(), batch_size))
    }

    /// Delete company-filter junction rows by junction ID.
    pub async fn delete_company_relations(
        &self,
        owner: &str,
        link_ids: &[i32],
    ) -> AppResult<BulkDeleteOutcome> {
        let batch_size = self.limits.batch_size as usize;
        let deleted = self
            .repo
            .delete_company_links(owner, link_ids, batch_size)
            .await?;
        Ok(BulkDeleteOutcome::new(deleted, link_ids.len(), batch_size))
    }

    /// Delete campaign-filter junction rows by junction ID.
    pub async fn delete_ad_campaign_relations(
        &self,
        owner: &str,
        link_ids: &[i32],
    ) -> AppResult<BulkDeleteOutcome> {
        let batch_size = self.limits.batch_size as usize;
        let deleted = self
            .repo
            .delete_ad_campaign_links(owner, link_ids, batch_size)
            .await?;
        Ok(BulkDeleteOutcome::new(deleted, link_ids.len(), batch_size))
    }

    /// Delete group-filter junction rows by junction ID.
    pub async fn delete_ad_group_relations(
        &self,
        owner: &str,
        link_ids: &[i32],
    ) -> AppResult<BulkDeleteOutcome> {
        let batch_size = self.limits.batch_size as usize;
        let deleted = self
            .repo
            .delete_ad_group_links(owner, link_ids, batch_size)
            .await?;
        Ok(BulkDeleteOutcome::new(deleted, link_ids.len(), batch_size))
    }

    fn clamp_batch(&self, batch_size: Option<u64>) -> usize {
        batch_size
            .unwrap_or(self.limits.batch_size)
            .clamp(1, self.limits.max_page_size) as usize
    }

    fn check_request_cap(&self, filter_ids: &[i32]) -> AppResult<()> {
        if filter_ids.len() > self.limits.max_keywords_per_request {
            return Err(AppError::BadRequest(format!(
                "At most {} filter ids per request",
                self.limits.max_keywords_per_request
            )));
        }
        Ok(())
    }

    async fn check_filter_ownership(&self, owner: &str, filter_ids: &[i32]) -> AppResult<()> {
        let unique: HashSet<i32> = filter_ids.iter().copied().collect();
        let found = self
            .repo
            .find_owned_many(owner, filter_ids)
            .await?
            .into_iter()
            .map(|f| f.id)
            .collect::<HashSet<_>>();

        let mut missing: Vec<i32> = unique.difference(&found).copied().collect();
        if missing.is_empty() {
            Ok(())
        } else {
            missing.sort_unstable();
            Err(AppError::NotFound(format!("Filters not found: {missing:?}")))
        }
    }

    async fn validate_targets(&self, owner: &str, targets: &RelationTargets) -> AppResult<()> {
        for &id in &targets.company_ids {
            self.company_repo.get_owned(id, owner).await?;
        }
        for &id in &targets.ad_campaign_ids {
            self.ad_campaign_repo.get_owned(id, owner).await?;
        }
        for &id in &targets.ad_group_ids {
            self.ad_group_repo.get_owned(id, owner).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: sea_orm::DatabaseConnection) -> FilterService {
        let db = Arc::new(db);
        FilterService::new(
            FilterRepository::new(db.clone()),
            CompanyRepository::new(db.clone()),
            AdCampaignRepository::new(db.clone()),
            AdGroupRepository::new(db),
            LimitsConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_update_relations_caps_request_size() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let ids: Vec<i32> = (0..101).collect();

        let err = service(db)
            .update_relations("user_a", &ids, true, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_attach_relations_unknown_filter() {
        // Ownership lookup returns nothing
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<filter::Model>::new()])
            .into_connection();

        let err = service(db)
            .attach_relations("user_a", &[5], &RelationTargets::default(), true, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_word_rejects_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = service(db).update_word("user_a", 1, "  ").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
