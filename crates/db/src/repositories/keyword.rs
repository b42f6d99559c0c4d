//! Keyword repository.
//!
//! Owns the keyword table plus the three keyword junction tables. Bulk
//! attachment runs inside a transaction per call so a batch either lands
//! completely or not at all.

use std::sync::Arc;

use crate::entities::{
    AdCampaignKeyword, AdGroupKeyword, CompanyKeyword, Keyword, ad_campaign_keyword,
    ad_group_keyword, company_keyword, keyword,
};
use kplanner_common::{AppError, AppResult};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};

/// The six independent match-type flags carried by keyword junction rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchFlags {
    #[serde(default)]
    pub broad: bool,
    #[serde(default)]
    pub phrase: bool,
    #[serde(default)]
    pub exact: bool,
    #[serde(default)]
    pub neg_broad: bool,
    #[serde(default)]
    pub neg_phrase: bool,
    #[serde(default)]
    pub neg_exact: bool,
}

impl From<&company_keyword::Model> for MatchFlags {
    fn from(m: &company_keyword::Model) -> Self {
        Self {
            broad: m.broad,
            phrase: m.phrase,
            exact: m.exact,
            neg_broad: m.neg_broad,
            neg_phrase: m.neg_phrase,
            neg_exact: m.neg_exact,
        }
    }
}

impl From<&ad_campaign_keyword::Model> for MatchFlags {
    fn from(m: &ad_campaign_keyword::Model) -> Self {
        Self {
            broad: m.broad,
            phrase: m.phrase,
            exact: m.exact,
            neg_broad: m.neg_broad,
            neg_phrase: m.neg_phrase,
            neg_exact: m.neg_exact,
        }
    }
}

impl From<&ad_group_keyword::Model> for MatchFlags {
    fn from(m: &ad_group_keyword::Model) -> Self {
        Self {
            broad: m.broad,
            phrase: m.phrase,
            exact: m.exact,
            neg_broad: m.neg_broad,
            neg_phrase: m.neg_phrase,
            neg_exact: m.neg_exact,
        }
    }
}

/// Which match-type flags may overwrite values already present on an
/// existing junction row. Flags without their override bit set are left
/// untouched on update and only apply when a row is first created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOverrides {
    #[serde(default)]
    pub broad: bool,
    #[serde(default)]
    pub phrase: bool,
    #[serde(default)]
    pub exact: bool,
    #[serde(default)]
    pub neg_broad: bool,
    #[serde(default)]
    pub neg_phrase: bool,
    #[serde(default)]
    pub neg_exact: bool,
}

/// Target entity IDs for a bulk attachment fan-out.
#[derive(Debug, Clone, Default)]
pub struct RelationTargets {
    pub company_ids: Vec<i32>,
    pub ad_campaign_ids: Vec<i32>,
    pub ad_group_ids: Vec<i32>,
}

impl RelationTargets {
    /// Total number of target entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.company_ids.len() + self.ad_campaign_ids.len() + self.ad_group_ids.len()
    }

    /// Whether no targets were given.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Counters accumulated across a bulk attachment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BulkOutcome {
    /// Keyword rows inserted.
    pub created: u64,
    /// Keyword rows reused.
    pub existing: u64,
    /// Junction rows inserted.
    pub relations_created: u64,
    /// Junction rows whose flags actually changed.
    pub relations_updated: u64,
}

/// Database-side filters for keyword listings.
#[derive(Debug, Clone, Default)]
pub struct KeywordListFilter {
    /// Case-insensitive substring match on the keyword text.
    pub search: Option<String>,
    pub created_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub created_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_after: Option<sea_orm::prelude::DateTimeWithTimeZone>,
    pub updated_before: Option<sea_orm::prelude::DateTimeWithTimeZone>,
}

enum LinkChange {
    Created,
    Updated,
    Unchanged,
}

/// Keyword repository for database operations.
#[derive(Clone)]
pub struct KeywordRepository {
    db: Arc<DatabaseConnection>,
}

impl KeywordRepository {
    /// Create a new keyword repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a keyword by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<keyword::Model>> {
        Keyword::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a keyword by ID, scoped to an owner.
    pub async fn find_owned(&self, id: i32, owner: &str) -> AppResult<Option<keyword::Model>> {
        Keyword::find_by_id(id)
            .filter(keyword::Column::ClerkUserId.eq(owner))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an owned keyword by ID, returning an error if not found.
    pub async fn get_owned(&self, id: i32, owner: &str) -> AppResult<keyword::Model> {
        self.find_owned(id, owner)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Keyword {id} not found")))
    }

    /// Find a keyword by exact text within an owner's namespace.
    pub async fn find_by_text(&self, owner: &str, text: &str) -> AppResult<Option<keyword::Model>> {
        Keyword::find()
            .filter(keyword::Column::ClerkUserId.eq(owner))
            .filter(keyword::Column::Keyword.eq(text))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the owner's keywords among the given IDs.
    pub async fn find_owned_many(&self, owner: &str, ids: &[i32]) -> AppResult<Vec<keyword::Model>> {
        Keyword::find()
            .filter(keyword::Column::ClerkUserId.eq(owner))
            .filter(keyword::Column::Id.is_in(ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a keyword.
    pub async fn update(&self, model: keyword::ActiveModel) -> AppResult<keyword::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All of the owner's keywords matching the database-side filters,
    /// ordered by ID.
    ///
    /// Presence-based filtering and sorting happens on top of this set, so no
    /// pagination is applied here.
    pub async fn find_filtered(
        &self,
        owner: &str,
        filter: &KeywordListFilter,
    ) -> AppResult<Vec<keyword::Model>> {
        let mut select = Keyword::find().filter(keyword::Column::ClerkUserId.eq(owner));

        if let Some(search) = &filter.search {
            select = select.filter(Expr::col(keyword::Column::Keyword).ilike(format!("%{search}%")));
        }
        if let Some(after) = filter.created_after {
            select = select.filter(keyword::Column::Created.gte(after));
        }
        if let Some(before) = filter.created_before {
            select = select.filter(keyword::Column::Created.lte(before));
        }
        if let Some(after) = filter.updated_after {
            select = select.filter(keyword::Column::Updated.gte(after));
        }
        if let Some(before) = filter.updated_before {
            select = select.filter(keyword::Column::Updated.lte(before));
        }

        select
            .order_by_asc(keyword::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete the owner's keywords by ID, in batches. Junction rows follow
    /// via cascade.
    pub async fn bulk_delete(&self, owner: &str, ids: &[i32], batch_size: usize) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in ids.chunks(batch_size.max(1)) {
            let result = Keyword::delete_many()
                .filter(keyword::Column::ClerkUserId.eq(owner))
                .filter(keyword::Column::Id.is_in(chunk.iter().copied()))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted += result.rows_affected;
        }
        Ok(deleted)
    }

    // === Junction reads ===

    /// All of the owner's company-keyword junction rows.
    pub async fn company_links(&self, owner: &str) -> AppResult<Vec<company_keyword::Model>> {
        CompanyKeyword::find()
            .filter(company_keyword::Column::ClerkUserId.eq(owner))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All of the owner's campaign-keyword junction rows.
    pub async fn ad_campaign_links(&self, owner: &str) -> AppResult<Vec<ad_campaign_keyword::Model>> {
        AdCampaignKeyword::find()
            .filter(ad_campaign_keyword::Column::ClerkUserId.eq(owner))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All of the owner's group-keyword junction rows.
    pub async fn ad_group_links(&self, owner: &str) -> AppResult<Vec<ad_group_keyword::Model>> {
        AdGroupKeyword::find()
            .filter(ad_group_keyword::Column::ClerkUserId.eq(owner))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Company-keyword rows for a page of keywords, restricted to the given
    /// companies.
    pub async fn company_links_for(
        &self,
        owner: &str,
        keyword_ids: &[i32],
        company_ids: &[i32],
    ) -> AppResult<Vec<company_keyword::Model>> {
        CompanyKeyword::find()
            .filter(company_keyword::Column::ClerkUserId.eq(owner))
            .filter(company_keyword::Column::KeywordId.is_in(keyword_ids.iter().copied()))
            .filter(company_keyword::Column::CompanyId.is_in(company_ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Campaign-keyword rows for a page of keywords, restricted to the given
    /// campaigns.
    pub async fn ad_campaign_links_for(
        &self,
        owner: &str,
        keyword_ids: &[i32],
        ad_campaign_ids: &[i32],
    ) -> AppResult<Vec<ad_campaign_keyword::Model>> {
        AdCampaignKeyword::find()
            .filter(ad_campaign_keyword::Column::ClerkUserId.eq(owner))
            .filter(ad_campaign_keyword::Column::KeywordId.is_in(keyword_ids.iter().copied()))
            .filter(
                ad_campaign_keyword::Column::AdCampaignId.is_in(ad_campaign_ids.iter().copied()),
            )
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Group-keyword rows for a page of keywords, restricted to the given
    /// groups.
    pub async fn ad_group_links_for(
        &self,
        owner: &str,
        keyword_ids: &[i32],
        ad_group_ids: &[i32],
    ) -> AppResult<Vec<ad_group_keyword::Model>> {
        AdGroupKeyword::find()
            .filter(ad_group_keyword::Column::ClerkUserId.eq(owner))
            .filter(ad_group_keyword::Column::KeywordId.is_in(keyword_ids.iter().copied()))
            .filter(ad_group_keyword::Column::AdGroupId.is_in(ad_group_ids.iter().copied()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // === Junction deletes ===

    /// Delete the owner's company-keyword junction rows by junction ID.
    pub async fn delete_company_links(
        &self,
        owner: &str,
        link_ids: &[i32],
        batch_size: usize,
    ) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in link_ids.chunks(batch_size.max(1)) {
            let result = CompanyKeyword::delete_many()
                .filter(company_keyword::Column::ClerkUserId.eq(owner))
                .filter(company_keyword::Column::Id.is_in(chunk.iter().copied()))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted += result.rows_affected;
        }
        Ok(deleted)
    }

    /// Delete the owner's campaign-keyword junction rows by junction ID.
    pub async fn delete_ad_campaign_links(
        &self,
        owner: &str,
        link_ids: &[i32],
        batch_size: usize,
    ) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in link_ids.chunks(batch_size.max(1)) {
            let result = AdCampaignKeyword::delete_many()
                .filter(ad_campaign_keyword::Column::ClerkUserId.eq(owner))
                .filter(ad_campaign_keyword::Column::Id.is_in(chunk.iter().copied()))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted += result.rows_affected;
        }
        Ok(deleted)
    }

    /// Delete the owner's group-keyword junction rows by junction ID.
    pub async fn delete_ad_group_links(
        &self,
        owner: &str,
        link_ids: &[i32],
        batch_size: usize,
    ) -> AppResult<u64> {
        let mut deleted = 0;
        for chunk in link_ids.chunks(batch_size.max(1)) {
            let result = AdGroupKeyword::delete_many()
                .filter(ad_group_keyword::Column::ClerkUserId.eq(owner))
                .filter(ad_group_keyword::Column::Id.is_in(chunk.iter().copied()))
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            deleted += result.rows_affected;
        }
        Ok(deleted)
    }

    // === Bulk attachment ===

    /// Attach a batch of keyword texts to the target entities.
    ///
    /// Each text is trimmed; empties are skipped. An existing keyword row is
    /// reused when the owner already has one for the text, otherwise a row is
    /// inserted. The association then fans out to every target: missing
    /// junction rows are created with the given flags, existing rows are
    /// updated only for flags whose override bit is set. The whole batch runs
    /// in one transaction.
    pub async fn attach_batch(
        &self,
        owner: &str,
        texts: &[String],
        targets: &RelationTargets,
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> AppResult<BulkOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut outcome = BulkOutcome::default();
        for text in texts {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (kw, created) = Self::find_or_create_keyword(&txn, owner, trimmed)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            if created {
                outcome.created += 1;
            } else {
                outcome.existing += 1;
            }

            Self::fan_out(&txn, owner, kw.id, targets, flags, overrides, &mut outcome)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(outcome)
    }

    /// Attach existing keywords (by ID) to the target entities.
    ///
    /// Same fan-out semantics as [`attach_batch`](Self::attach_batch); the
    /// caller is expected to have resolved the IDs to owned keywords already.
    pub async fn attach_existing_batch(
        &self,
        owner: &str,
        keyword_ids: &[i32],
        targets: &RelationTargets,
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> AppResult<BulkOutcome> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut outcome = BulkOutcome::default();
        for &keyword_id in keyword_ids {
            Self::fan_out(&txn, owner, keyword_id, targets, flags, overrides, &mut outcome)
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(outcome)
    }

    /// Update every existing junction row of the given keywords across all
    /// three levels, changing only flags whose override bit is set.
    ///
    /// Returns the number of junction rows whose stored flags actually
    /// changed.
    pub async fn update_relations(
        &self,
        owner: &str,
        keyword_ids: &[i32],
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> AppResult<u64> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut updated = 0;

        let rows = CompanyKeyword::find()
            .filter(company_keyword::Column::ClerkUserId.eq(owner))
            .filter(company_keyword::Column::KeywordId.is_in(keyword_ids.iter().copied()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        for row in rows {
            if let Some(am) = Self::overridden_company_link(&row, flags, overrides) {
                am.update(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                updated += 1;
            }
        }

        let rows = AdCampaignKeyword::find()
            .filter(ad_campaign_keyword::Column::ClerkUserId.eq(owner))
            .filter(ad_campaign_keyword::Column::KeywordId.is_in(keyword_ids.iter().copied()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        for row in rows {
            if let Some(am) = Self::overridden_ad_campaign_link(&row, flags, overrides) {
                am.update(&txn)
                    .await
                    .map_err(|e| AppError::Database(e.to_string()))?;
                updated += 1;
            }
        }

        let rows = AdGroupKeyword::find()
            .filter(ad_group_keyword::Column::ClerkUserId.eq(owner))
            .filter(ad_group_keyword::Column::KeywordId.is_in(keyword_ids.iter().copied()))
            .all(&txn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        for row in rows {
            if let Some(am) = Self::overridden_ad_group_link(&row, flags, overrides) {
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

    async fn find_or_create_keyword<C: ConnectionTrait>(
        conn: &C,
        owner: &str,
        text: &str,
    ) -> Result<(keyword::Model, bool), DbErr> {
        let existing = Keyword::find()
            .filter(keyword::Column::ClerkUserId.eq(owner))
            .filter(keyword::Column::Keyword.eq(text))
            .one(conn)
            .await?;

        if let Some(kw) = existing {
            return Ok((kw, false));
        }

        let model = keyword::ActiveModel {
            keyword: Set(text.to_string()),
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
        keyword_id: i32,
        targets: &RelationTargets,
        flags: MatchFlags,
        overrides: MatchOverrides,
        outcome: &mut BulkOutcome,
    ) -> Result<(), DbErr> {
        for &company_id in &targets.company_ids {
            let change =
                Self::upsert_company_link(conn, owner, company_id, keyword_id, flags, overrides)
                    .await?;
            outcome.record(&change);
        }
        for &ad_campaign_id in &targets.ad_campaign_ids {
            let change = Self::upsert_ad_campaign_link(
                conn,
                owner,
                ad_campaign_id,
                keyword_id,
                flags,
                overrides,
            )
            .await?;
            outcome.record(&change);
        }
        for &ad_group_id in &targets.ad_group_ids {
            let change =
                Self::upsert_ad_group_link(conn, owner, ad_group_id, keyword_id, flags, overrides)
                    .await?;
            outcome.record(&change);
        }
        Ok(())
    }

    async fn upsert_company_link<C: ConnectionTrait>(
        conn: &C,
        owner: &str,
        company_id: i32,
        keyword_id: i32,
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> Result<LinkChange, DbErr> {
        let existing = CompanyKeyword::find()
            .filter(company_keyword::Column::CompanyId.eq(company_id))
            .filter(company_keyword::Column::KeywordId.eq(keyword_id))
            .one(conn)
            .await?;

        match existing {
            Some(row) => match Self::overridden_company_link(&row, flags, overrides) {
                Some(am) => {
                    am.update(conn).await?;
                    Ok(LinkChange::Updated)
                }
                None => Ok(LinkChange::Unchanged),
            },
            None => {
                company_keyword::ActiveModel {
                    company_id: Set(company_id),
                    keyword_id: Set(keyword_id),
                    clerk_user_id: Set(owner.to_string()),
                    broad: Set(flags.broad),
                    phrase: Set(flags.phrase),
                    exact: Set(flags.exact),
                    neg_broad: Set(flags.neg_broad),
                    neg_phrase: Set(flags.neg_phrase),
                    neg_exact: Set(flags.neg_exact),
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
        keyword_id: i32,
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> Result<LinkChange, DbErr> {
        let existing = AdCampaignKeyword::find()
            .filter(ad_campaign_keyword::Column::AdCampaignId.eq(ad_campaign_id))
            .filter(ad_campaign_keyword::Column::KeywordId.eq(keyword_id))
            .one(conn)
            .await?;

        match existing {
            Some(row) => match Self::overridden_ad_campaign_link(&row, flags, overrides) {
                Some(am) => {
                    am.update(conn).await?;
                    Ok(LinkChange::Updated)
                }
                None => Ok(LinkChange::Unchanged),
            },
            None => {
                ad_campaign_keyword::ActiveModel {
                    ad_campaign_id: Set(ad_campaign_id),
                    keyword_id: Set(keyword_id),
                    clerk_user_id: Set(owner.to_string()),
                    broad: Set(flags.broad),
                    phrase: Set(flags.phrase),
                    exact: Set(flags.exact),
                    neg_broad: Set(flags.neg_broad),
                    neg_phrase: Set(flags.neg_phrase),
                    neg_exact: Set(flags.neg_exact),
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
        keyword_id: i32,
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> Result<LinkChange, DbErr> {
        let existing = AdGroupKeyword::find()
            .filter(ad_group_keyword::Column::AdGroupId.eq(ad_group_id))
            .filter(ad_group_keyword::Column::KeywordId.eq(keyword_id))
            .one(conn)
            .await?;

        match existing {
            Some(row) => match Self::overridden_ad_group_link(&row, flags, overrides) {
                Some(am) => {
                    am.update(conn).await?;
                    Ok(LinkChange::Updated)
                }
                None => Ok(LinkChange::Unchanged),
            },
            None => {
                ad_group_keyword::ActiveModel {
                    ad_group_id: Set(ad_group_id),
                    keyword_id: Set(keyword_id),
                    clerk_user_id: Set(owner.to_string()),
                    broad: Set(flags.broad),
                    phrase: Set(flags.phrase),
                    exact: Set(flags.exact),
                    neg_broad: Set(flags.neg_broad),
                    neg_phrase: Set(flags.neg_phrase),
                    neg_exact: Set(flags.neg_exact),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                Ok(LinkChange::Created)
            }
        }
    }

    fn overridden_company_link(
        row: &company_keyword::Model,
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> Option<company_keyword::ActiveModel> {
        let mut am = row.clone().into_active_model();
        let mut changed = false;
        if overrides.broad && row.broad != flags.broad {
            am.broad = Set(flags.broad);
            changed = true;
        }
        if overrides.phrase && row.phrase != flags.phrase {
            am.phrase = Set(flags.phrase);
            changed = true;
        }
        if overrides.exact && row.exact != flags.exact {
            am.exact = Set(flags.exact);
            changed = true;
        }
        if overrides.neg_broad && row.neg_broad != flags.neg_broad {
            am.neg_broad = Set(flags.neg_broad);
            changed = true;
        }
        if overrides.neg_phrase && row.neg_phrase != flags.neg_phrase {
            am.neg_phrase = Set(flags.neg_phrase);
            changed = true;
        }
        if overrides.neg_exact && row.neg_exact != flags.neg_exact {
            am.neg_exact = Set(flags.neg_exact);
            changed = true;
        }
        changed.then_some(am)
    }

    fn overridden_ad_campaign_link(
        row: &ad_campaign_keyword::Model,
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> Option<ad_campaign_keyword::ActiveModel> {
        let mut am = row.clone().into_active_model();
        let mut changed = false;
        if overrides.broad && row.broad != flags.broad {
            am.broad = Set(flags.broad);
            changed = true;
        }
        if overrides.phrase && row.phrase != flags.phrase {
            am.phrase = Set(flags.phrase);
            changed = true;
        }
        if overrides.exact && row.exact != flags.exact {
            am.exact = Set(flags.exact);
            changed = true;
        }
        if overrides.neg_broad && row.neg_broad != flags.neg_broad {
            am.neg_broad = Set(flags.neg_broad);
            changed = true;
        }
        if overrides.neg_phrase && row.neg_phrase != flags.neg_phrase {
            am.neg_phrase = Set(flags.neg_phrase);
            changed = true;
        }
        if overrides.neg_exact && row.neg_exact != flags.neg_exact {
            am.neg_exact = Set(flags.neg_exact);
            changed = true;
        }
        changed.then_some(am)
    }

    fn overridden_ad_group_link(
        row: &ad_group_keyword::Model,
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> Option<ad_group_keyword::ActiveModel> {
        let mut am = row.clone().into_active_model();
        let mut changed = false;
        if overrides.broad && row.broad != flags.broad {
            am.broad = Set(flags.broad);
            changed = true;
        }
        if overrides.phrase && row.phrase != flags.phrase {
            am.phrase = Set(flags.phrase);
            changed = true;
        }
        if overrides.exact && row.exact != flags.exact {
            am.exact = Set(flags.exact);
            changed = true;
        }
        if overrides.neg_broad && row.neg_broad != flags.neg_broad {
            am.neg_broad = Set(flags.neg_broad);
            changed = true;
        }
        if overrides.neg_phrase && row.neg_phrase != flags.neg_phrase {
            am.neg_phrase = Set(flags.neg_phrase);
            changed = true;
        }
        if overrides.neg_exact && row.neg_exact != flags.neg_exact {
            am.neg_exact = Set(flags.neg_exact);
            changed = true;
        }
        changed.then_some(am)
    }
}

impl BulkOutcome {
    fn record(&mut self, change: &LinkChange) {
        match change {
            LinkChange::Created => self.relations_created += 1,
            LinkChange::Updated => self.relations_updated += 1,
            LinkChange::Unchanged => {}
        }
    }

    /// Merge counters from another batch.
    pub fn merge(&mut self, other: Self) {
        self.created += other.created;
        self.existing += other.existing;
        self.relations_created += other.relations_created;
        self.relations_updated += other.relations_updated;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn keyword_model(id: i32, text: &str, owner: &str) -> keyword::Model {
        let now = chrono::Utc::now().fixed_offset();
        keyword::Model {
            id,
            keyword: text.to_string(),
            clerk_user_id: owner.to_string(),
            created: now,
            updated: now,
        }
    }

    fn link_model(id: i32, company_id: i32, keyword_id: i32) -> company_keyword::Model {
        company_keyword::Model {
            id,
            company_id,
            keyword_id,
            clerk_user_id: "user_a".to_string(),
            broad: true,
            phrase: false,
            exact: false,
            neg_broad: false,
            neg_phrase: false,
            neg_exact: false,
        }
    }

    #[test]
    fn test_override_skips_unflagged_fields() {
        let row = link_model(1, 10, 20);
        let flags = MatchFlags {
            broad: false,
            phrase: true,
            ..Default::default()
        };
        // Only phrase may be overridden; broad stays true even though the
        // incoming value differs.
        let overrides = MatchOverrides {
            phrase: true,
            ..Default::default()
        };

        let am = KeywordRepository::overridden_company_link(&row, flags, overrides).unwrap();
        assert!(matches!(am.phrase, sea_orm::ActiveValue::Set(true)));
        assert!(matches!(am.broad, sea_orm::ActiveValue::Unchanged(true)));
    }

    #[test]
    fn test_override_no_change_returns_none() {
        let row = link_model(1, 10, 20);
        let flags = MatchFlags {
            broad: true,
            ..Default::default()
        };
        let overrides = MatchOverrides {
            broad: true,
            ..Default::default()
        };

        assert!(KeywordRepository::overridden_company_link(&row, flags, overrides).is_none());
    }

    #[tokio::test]
    async fn test_find_by_text() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![keyword_model(1, "running shoes", "user_a")]])
            .into_connection();
        let repo = KeywordRepository::new(Arc::new(db));

        let found = repo.find_by_text("user_a", "running shoes").await.unwrap();
        assert_eq!(found.unwrap().id, 1);
    }

    #[tokio::test]
    async fn test_bulk_delete_empty_ids() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = KeywordRepository::new(Arc::new(db));

        let deleted = repo.bulk_delete("user_a", &[], 25).await.unwrap();
        assert_eq!(deleted, 0);
    }

    #[tokio::test]
    async fn test_delete_company_links() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 3,
            }])
            .into_connection();
        let repo = KeywordRepository::new(Arc::new(db));

        let deleted = repo
            .delete_company_links("user_a", &[1, 2, 3], 25)
            .await
            .unwrap();
        assert_eq!(deleted, 3);
    }
}
