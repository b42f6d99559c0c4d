//! Ad campaign service.

use chrono::Utc;
use kplanner_common::config::LimitsConfig;
use kplanner_common::{AppError, AppResult};
use kplanner_db::entities::ad_campaign;
use kplanner_db::repositories::ad_campaign::AdCampaignListQuery;
use kplanner_db::repositories::{AdCampaignRepository, CompanyRepository, PageRequest};
use sea_orm::ActiveValue::Set;
use sea_orm::IntoActiveModel;

use crate::services::BulkDeleteOutcome;
use crate::services::company::validate_title;

/// Service for managing ad campaigns.
#[derive(Clone)]
pub struct AdCampaignService {
    repo: AdCampaignRepository,
    company_repo: CompanyRepository,
    limits: LimitsConfig,
}

impl AdCampaignService {
    /// Create a new ad campaign service.
    #[must_use]
    pub const fn new(
        repo: AdCampaignRepository,
        company_repo: CompanyRepository,
        limits: LimitsConfig,
    ) -> Self {
        Self {
            repo,
            company_repo,
            limits,
        }
    }

    /// Get an owned campaign by ID.
    pub async fn get(&self, owner: &str, id: i32) -> AppResult<ad_campaign::Model> {
        self.repo.get_owned(id, owner).await
    }

    /// List the owner's campaigns.
    pub async fn list(
        &self,
        owner: &str,
        query: &AdCampaignListQuery,
        page: u64,
        page_size: Option<u64>,
    ) -> AppResult<(Vec<ad_campaign::Model>, u64, PageRequest)> {
        let page = PageRequest {
            page: page.max(1),
            page_size: page_size
                .unwrap_or(self.limits.page_size)
                .clamp(1, self.limits.max_page_size),
        };
        let (items, total) = self.repo.list(owner, query, page).await?;
        Ok((items, total, page))
    }

    /// Create a campaign, validating parent ownership when a company is
    /// given.
    pub async fn create(
        &self,
        owner: &str,
        title: &str,
        company_id: Option<i32>,
        is_active: bool,
    ) -> AppResult<(ad_campaign::Model, Option<String>)> {
        let title = validate_title(title)?;

        if let Some(company_id) = company_id {
            self.company_repo.get_owned(company_id, owner).await?;
        }

        let (is_active, message) = if is_active {
            self.check_activation(owner).await?
        } else {
            (false, None)
        };

        let model = self
            .repo
            .create(ad_campaign::ActiveModel {
                title: Set(title),
                clerk_user_id: Set(owner.to_string()),
                is_active: Set(is_active),
                company_id: Set(company_id),
                ..Default::default()
            })
            .await?;

        Ok((model, message))
    }

    /// Update a campaign's title, parent, and/or active state.
    ///
    /// `company_id` uses double-option semantics: `None` leaves the parent
    /// alone, `Some(None)` detaches it, `Some(Some(id))` reparents after an
    /// ownership check.
    pub async fn update(
        &self,
        owner: &str,
        id: i32,
        title: Option<&str>,
        company_id: Option<Option<i32>>,
        is_active: Option<bool>,
    ) -> AppResult<(ad_campaign::Model, Option<String>)> {
        let current = self.repo.get_owned(id, owner).await?;

        let mut message = None;
        let mut am = current.clone().into_active_model();

        if let Some(title) = title {
            am.title = Set(validate_title(title)?);
        }
        if let Some(parent) = company_id {
            if let Some(company_id) = parent {
                self.company_repo.get_owned(company_id, owner).await?;
            }
            am.company_id = Set(parent);
        }
        if let Some(requested) = is_active {
            if requested && !current.is_active {
                let (granted, msg) = self.check_activation(owner).await?;
                am.is_active = Set(granted);
                message = msg;
            } else {
                am.is_active = Set(requested);
            }
        }
        am.updated = Set(Utc::now().fixed_offset());

        let model = self.repo.update(am).await?;
        Ok((model, message))
    }

    /// Flip a campaign's active state, enforcing the active cap.
    pub async fn toggle(&self, owner: &str, id: i32) -> AppResult<ad_campaign::Model> {
        let current = self.repo.get_owned(id, owner).await?;

        if !current.is_active {
            let active = self.repo.count_active(owner).await?;
            if active >= self.limits.ad_campaign_active_limit {
                return Err(AppError::BadRequest(format!(
                    "Active limit reached: at most {} ad campaigns can be active",
                    self.limits.ad_campaign_active_limit
                )));
            }
        }

        let mut am = current.clone().into_active_model();
        am.is_active = Set(!current.is_active);
        am.updated = Set(Utc::now().fixed_offset());
        self.repo.update(am).await
    }

    /// Delete the owner's campaigns by ID, in batches.
    pub async fn bulk_delete(&self, owner: &str, ids: &[i32]) -> AppResult<BulkDeleteOutcome> {
        let batch_size = self.limits.batch_size as usize;
        let deleted = self.repo.bulk_delete(owner, ids, batch_size).await?;
        Ok(BulkDeleteOutcome::new(deleted, ids.len(), batch_size))
    }

    async fn check_activation(&self, owner: &str) -> AppResult<(bool, Option<String>)> {
        let active = self.repo.count_active(owner).await?;
        if active >= self.limits.ad_campaign_active_limit {
            Ok((
                false,
                Some(format!(
                    "Active limit reached: at most {} ad campaigns can be active; saved as inactive",
                    self.limits.ad_campaign_active_limit
                )),
            ))
        } else {
            Ok((true, None))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use kplanner_db::entities::company;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: sea_orm::DatabaseConnection) -> AdCampaignService {
        let db = Arc::new(db);
        AdCampaignService::new(
            AdCampaignRepository::new(db.clone()),
            CompanyRepository::new(db),
            LimitsConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_create_with_unknown_parent() {
        // Parent lookup comes back empty
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<company::Model>::new()])
            .into_connection();

        let err = service(db)
            .create("user_a", "Spring push", Some(99), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = service(db)
            .create("user_a", "", None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
