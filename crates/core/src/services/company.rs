//! Company service.

use chrono::Utc;
use kplanner_common::config::LimitsConfig;
use kplanner_common::{AppError, AppResult};
use kplanner_db::entities::company;
use kplanner_db::repositories::company::CompanyListQuery;
use kplanner_db::repositories::{CompanyRepository, PageRequest};
use sea_orm::ActiveValue::Set;
use sea_orm::IntoActiveModel;

use crate::services::BulkDeleteOutcome;

/// Service for managing companies.
#[derive(Clone)]
pub struct CompanyService {
    repo: CompanyRepository,
    limits: LimitsConfig,
}

impl CompanyService {
    /// Create a new company service.
    #[must_use]
    pub const fn new(repo: CompanyRepository, limits: LimitsConfig) -> Self {
        Self { repo, limits }
    }

    /// Get an owned company by ID.
    pub async fn get(&self, owner: &str, id: i32) -> AppResult<company::Model> {
        self.repo.get_owned(id, owner).await
    }

    /// List the owner's companies.
    ///
    /// Page is clamped to start at 1, page size to `1..=max_page_size`.
    pub async fn list(
        &self,
        owner: &str,
        query: &CompanyListQuery,
        page: u64,
        page_size: Option<u64>,
    ) -> AppResult<(Vec<company::Model>, u64, PageRequest)> {
        let page = PageRequest {
            page: page.max(1),
            page_size: page_size
                .unwrap_or(self.limits.page_size)
                .clamp(1, self.limits.max_page_size),
        };
        let (items, total) = self.repo.list(owner, query, page).await?;
        Ok((items, total, page))
    }

    /// Create a company.
    ///
    /// When `is_active` is requested but the owner is already at the active
    /// cap, the company is created inactive and a message explains why.
    pub async fn create(
        &self,
        owner: &str,
        title: &str,
        is_active: bool,
    ) -> AppResult<(company::Model, Option<String>)> {
        let title = validate_title(title)?;

        let (is_active, message) = if is_active {
            self.check_activation(owner).await?
        } else {
            (false, None)
        };

        let model = self
            .repo
            .create(company::ActiveModel {
                title: Set(title),
                clerk_user_id: Set(owner.to_string()),
                is_active: Set(is_active),
                ..Default::default()
            })
            .await?;

        Ok((model, message))
    }

    /// Update a company's title and/or active state.
    pub async fn update(
        &self,
        owner: &str,
        id: i32,
        title: Option<&str>,
        is_active: Option<bool>,
    ) -> AppResult<(company::Model, Option<String>)> {
        let current = self.repo.get_owned(id, owner).await?;

        let mut message = None;
        let mut am = current.clone().into_active_model();

        if let Some(title) = title {
            am.title = Set(validate_title(title)?);
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

    /// Flip a company's active state, enforcing the active cap.
    pub async fn toggle(&self, owner: &str, id: i32) -> AppResult<company::Model> {
        let current = self.repo.get_owned(id, owner).await?;

        if !current.is_active {
            let active = self.repo.count_active(owner).await?;
            if active >= self.limits.company_active_limit {
                return Err(AppError::BadRequest(format!(
                    "Active limit reached: at most {} companies can be active",
                    self.limits.company_active_limit
                )));
            }
        }

        let mut am = current.clone().into_active_model();
        am.is_active = Set(!current.is_active);
        am.updated = Set(Utc::now().fixed_offset());
        self.repo.update(am).await
    }

    /// Delete the owner's companies by ID, in batches.
    pub async fn bulk_delete(&self, owner: &str, ids: &[i32]) -> AppResult<BulkDeleteOutcome> {
        let batch_size = self.limits.batch_size as usize;
        let deleted = self.repo.bulk_delete(owner, ids, batch_size).await?;
        Ok(BulkDeleteOutcome::new(deleted, ids.len(), batch_size))
    }

    async fn check_activation(&self, owner: &str) -> AppResult<(bool, Option<String>)> {
        let active = self.repo.count_active(owner).await?;
        if active >= self.limits.company_active_limit {
            Ok((
                false,
                Some(format!(
                    "Active limit reached: at most {} companies can be active; saved as inactive",
                    self.limits.company_active_limit
                )),
            ))
        } else {
            Ok((true, None))
        }
    }
}

pub(crate) fn validate_title(title: &str) -> AppResult<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation("Title must not be empty".to_string()));
    }
    if trimmed.len() > 255 {
        return Err(AppError::Validation(
            "Title must be at most 255 characters".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service(db: sea_orm::DatabaseConnection) -> CompanyService {
        CompanyService::new(CompanyRepository::new(Arc::new(db)), LimitsConfig::default())
    }

    #[tokio::test]
    async fn test_create_rejects_empty_title() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = service(db)
            .create("user_a", "   ", false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_get_missing_company() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<company::Model>::new()])
            .into_connection();
        let err = service(db).get("user_a", 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_validate_title_trims() {
        assert_eq!(validate_title("  Acme  ").unwrap(), "Acme");
        assert!(validate_title(&"x".repeat(256)).is_err());
    }
}
