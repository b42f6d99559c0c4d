//! Keyword service.
//!
//! Carries the bulk create/attach algorithms and the matrix listing that
//! joins keywords with their per-entity match flags.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Utc;
use kplanner_common::config::LimitsConfig;
use kplanner_common::{AppError, AppResult};
use kplanner_db::entities::keyword;
use kplanner_db::repositories::keyword::{
    BulkOutcome, KeywordListFilter, MatchFlags, MatchOverrides, RelationTargets,
};
use kplanner_db::repositories::{
    AdCampaignRepository, AdGroupRepository, CompanyRepository, KeywordRepository, PageRequest,
    SortOrder,
};
use sea_orm::ActiveValue::Set;
use sea_orm::IntoActiveModel;
use serde::{Deserialize, Serialize};

use crate::services::BulkDeleteOutcome;

/// Sortable fields for the keyword matrix. The `has_*` fields sort on flag
/// presence; descending puts keywords carrying the flag first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSortField {
    Id,
    Keyword,
    #[default]
    Created,
    Updated,
    HasBroad,
    HasPhrase,
    HasExact,
    HasNegBroad,
    HasNegPhrase,
    HasNegExact,
}

/// Flag-presence summary for one keyword across all of its junction rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MatchPresence {
    pub has_broad: bool,
    pub has_phrase: bool,
    pub has_exact: bool,
    pub has_neg_broad: bool,
    pub has_neg_phrase: bool,
    pub has_neg_exact: bool,
}

impl MatchPresence {
    fn absorb(&mut self, flags: MatchFlags) {
        self.has_broad |= flags.broad;
        self.has_phrase |= flags.phrase;
        self.has_exact |= flags.exact;
        self.has_neg_broad |= flags.neg_broad;
        self.has_neg_phrase |= flags.neg_phrase;
        self.has_neg_exact |= flags.neg_exact;
    }

    const fn field(&self, field: KeywordSortField) -> bool {
        match field {
            KeywordSortField::HasBroad => self.has_broad,
            KeywordSortField::HasPhrase => self.has_phrase,
            KeywordSortField::HasExact => self.has_exact,
            KeywordSortField::HasNegBroad => self.has_neg_broad,
            KeywordSortField::HasNegPhrase => self.has_neg_phrase,
            KeywordSortField::HasNegExact => self.has_neg_exact,
            _ => false,
        }
    }
}

/// Presence filters for the matrix listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PresenceFilters {
    pub has_broad: Option<bool>,
    pub has_phrase: Option<bool>,
    pub has_exact: Option<bool>,
    pub has_neg_broad: Option<bool>,
    pub has_neg_phrase: Option<bool>,
    pub has_neg_exact: Option<bool>,
}

impl PresenceFilters {
    fn matches(&self, presence: MatchPresence) -> bool {
        fn check(wanted: Option<bool>, actual: bool) -> bool {
            wanted.is_none_or(|w| w == actual)
        }
        check(self.has_broad, presence.has_broad)
            && check(self.has_phrase, presence.has_phrase)
            && check(self.has_exact, presence.has_exact)
            && check(self.has_neg_broad, presence.has_neg_broad)
            && check(self.has_neg_phrase, presence.has_neg_phrase)
            && check(self.has_neg_exact, presence.has_neg_exact)
    }
}

/// Full parameter set for the matrix listing.
#[derive(Debug, Clone, Default)]
pub struct KeywordMatrixQuery {
    /// Database-side filters (search, date ranges).
    pub filter: KeywordListFilter,
    /// Keep only keywords attached to at least one entity, active or not.
    pub only_attached: bool,
    /// Flag-presence filters.
    pub presence: PresenceFilters,
    /// Up to three sort levels, applied in order.
    pub sort: Vec<(KeywordSortField, SortOrder)>,
}

/// Per-entity match flags for one keyword, keyed by active entity ID.
#[derive(Debug, Clone, Default, Serialize)]
pub struct KeywordRelations {
    pub companies: BTreeMap<i32, MatchFlags>,
    pub ad_campaigns: BTreeMap<i32, MatchFlags>,
    pub ad_groups: BTreeMap<i32, MatchFlags>,
}

/// One keyword row of the matrix.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordMatrixItem {
    #[serde(flatten)]
    pub keyword: keyword::Model,
    #[serde(flatten)]
    pub presence: MatchPresence,
    pub relations: KeywordRelations,
}

/// One page of the keyword matrix.
#[derive(Debug, Clone, Serialize)]
pub struct KeywordMatrixPage {
    pub items: Vec<KeywordMatrixItem>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
}

/// Service for managing keywords and their entity relations.
#[derive(Clone)]
pub struct KeywordService {
    repo: KeywordRepository,
    company_repo: CompanyRepository,
    ad_campaign_repo: AdCampaignRepository,
    ad_group_repo: AdGroupRepository,
    limits: LimitsConfig,
}

impl KeywordService {
    /// Create a new keyword service.
    #[must_use]
    pub const fn new(
        repo: KeywordRepository,
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

    /// Get an owned keyword by ID.
    pub async fn get(&self, owner: &str, id: i32) -> AppResult<keyword::Model> {
        self.repo.get_owned(id, owner).await
    }

    /// Rename a keyword, keeping the per-owner uniqueness invariant.
    pub async fn update_text(&self, owner: &str, id: i32, text: &str) -> AppResult<keyword::Model> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "Keyword must not be empty".to_string(),
            ));
        }
        if trimmed.len() > 255 {
            return Err(AppError::Validation(
                "Keyword must be at most 255 characters".to_string(),
            ));
        }

        let current = self.repo.get_owned(id, owner).await?;

        if let Some(other) = self.repo.find_by_text(owner, trimmed).await?
            && other.id != current.id
        {
            return Err(AppError::Conflict(format!(
                "Keyword '{trimmed}' already exists"
            )));
        }

        let mut am = current.into_active_model();
        am.keyword = Set(trimmed.to_string());
        am.updated = Set(Utc::now().fixed_offset());
        self.repo.update(am).await
    }

    /// Bulk-create keywords and fan their associations out to the target
    /// entities.
    ///
    /// Texts are processed in batches, each committing its own transaction.
    /// Returns merged counters plus the number of batches processed.
    pub async fn bulk_create(
        &self,
        owner: &str,
        texts: &[String],
        targets: &RelationTargets,
        flags: MatchFlags,
        overrides: MatchOverrides,
        batch_size: Option<u64>,
    ) -> AppResult<(BulkOutcome, u64)> {
        let batch_size = self.clamp_batch(batch_size);
        self.validate_targets(owner, targets).await?;

        let mut outcome = BulkOutcome::default();
        let mut batches = 0;
        for chunk in texts.chunks(batch_size) {
            let batch = self
                .repo
                .attach_batch(owner, chunk, targets, flags, overrides)
                .await?;
            outcome.merge(batch);
            batches += 1;
        }

        Ok((outcome, batches))
    }

    /// Fan existing keywords out to the target entities.
    pub async fn attach_relations(
        &self,
        owner: &str,
        keyword_ids: &[i32],
        targets: &RelationTargets,
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> AppResult<(BulkOutcome, u64)> {
        self.check_request_cap(keyword_ids)?;
        self.check_keyword_ownership(owner, keyword_ids).await?;
        self.validate_targets(owner, targets).await?;

        let batch_size = self.clamp_batch(None);
        let mut outcome = BulkOutcome::default();
        let mut batches = 0;
        for chunk in keyword_ids.chunks(batch_size) {
            let batch = self
                .repo
                .attach_existing_batch(owner, chunk, targets, flags, overrides)
                .await?;
            outcome.merge(batch);
            batches += 1;
        }

        Ok((outcome, batches))
    }

    /// Update every existing junction row of the given keywords, changing
    /// only flags whose override bit is set. Returns the number of rows that
    /// actually changed.
    pub async fn update_relations(
        &self,
        owner: &str,
        keyword_ids: &[i32],
        flags: MatchFlags,
        overrides: MatchOverrides,
    ) -> AppResult<u64> {
        self.check_request_cap(keyword_ids)?;
        self.check_keyword_ownership(owner, keyword_ids).await?;
        self.repo
            .update_relations(owner, keyword_ids, flags, overrides)
            .await
    }

    /// Delete the owner's keywords by ID, in batches.
    pub async fn bulk_delete(&self, owner: &str, ids: &[i32]) -> AppResult<BulkDeleteOutcome> {
        let batch_size = self.limits.batch_size as usize;
        let deleted = self.repo.bulk_delete(owner, ids, batch_size).await?;
        Ok(BulkDeleteOutcome::new(deleted, ids.len(), batch_size))
    }

    /// Delete company-keyword junction rows by junction ID.
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

    /// Delete campaign-keyword junction rows by junction ID.
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

    /// Delete group-keyword junction rows by junction ID.
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

    /// The keyword matrix: one page of keywords with presence summaries and
    /// per-active-entity match flags.
    ///
    /// Database-side filters narrow the keyword set first; presence is then
    /// computed over all of the owner's junction rows, so `only_attached` and
    /// the `has_*` filters see attachments to inactive entities too. Active
    /// entities narrow the result in two places only: when the owner has any
    /// active entities, keywords attached to none of them are dropped from
    /// the listing, and the per-entity relations maps cover active entities
    /// only.
    pub async fn matrix(
        &self,
        owner: &str,
        query: &KeywordMatrixQuery,
        page: u64,
        page_size: Option<u64>,
    ) -> AppResult<KeywordMatrixPage> {
        let page = PageRequest {
            page: page.max(1),
            page_size: page_size
                .unwrap_or(self.limits.page_size)
                .clamp(1, self.limits.max_page_size),
        };
        if query.sort.len() > 3 {
            return Err(AppError::BadRequest(
                "At most three sort levels are supported".to_string(),
            ));
        }

        let keywords = self.repo.find_filtered(owner, &query.filter).await?;

        let active_companies: HashSet<i32> =
            self.company_repo.active_ids(owner).await?.into_iter().collect();
        let active_campaigns: HashSet<i32> = self
            .ad_campaign_repo
            .active_ids(owner)
            .await?
            .into_iter()
            .collect();
        let active_groups: HashSet<i32> =
            self.ad_group_repo.active_ids(owner).await?.into_iter().collect();
        let has_active_entities =
            !(active_companies.is_empty() && active_campaigns.is_empty() && active_groups.is_empty());

        // Presence over all of the owner's junction rows; active attachment
        // tracked separately for the drop rule
        let mut presence: HashMap<i32, MatchPresence> = HashMap::new();
        let mut active_attached: HashSet<i32> = HashSet::new();
        for link in self.repo.company_links(owner).await? {
            presence
                .entry(link.keyword_id)
                .or_default()
                .absorb(MatchFlags::from(&link));
            if active_companies.contains(&link.company_id) {
                active_attached.insert(link.keyword_id);
            }
        }
        for link in self.repo.ad_campaign_links(owner).await? {
            presence
                .entry(link.keyword_id)
                .or_default()
                .absorb(MatchFlags::from(&link));
            if active_campaigns.contains(&link.ad_campaign_id) {
                active_attached.insert(link.keyword_id);
            }
        }
        for link in self.repo.ad_group_links(owner).await? {
            presence
                .entry(link.keyword_id)
                .or_default()
                .absorb(MatchFlags::from(&link));
            if active_groups.contains(&link.ad_group_id) {
                active_attached.insert(link.keyword_id);
            }
        }

        let mut filtered =
            collect_matrix_rows(keywords, &presence, &active_attached, has_active_entities, query);

        filtered.sort_by(|a, b| compare_matrix_rows(a, b, sort_keys(&query.sort)));

        let total = filtered.len() as u64;
        let start = (page.index() * page.page_size) as usize;
        let window: Vec<(keyword::Model, MatchPresence)> = filtered
            .into_iter()
            .skip(start)
            .take(page.page_size as usize)
            .collect();

        let page_ids: Vec<i32> = window.iter().map(|(kw, _)| kw.id).collect();
        let relations = self
            .page_relations(
                owner,
                &page_ids,
                &active_companies,
                &active_campaigns,
                &active_groups,
            )
            .await?;

        let items = window
            .into_iter()
            .map(|(kw, p)| {
                let relations = relations.get(&kw.id).cloned().unwrap_or_default();
                KeywordMatrixItem {
                    keyword: kw,
                    presence: p,
                    relations,
                }
            })
            .collect();

        Ok(KeywordMatrixPage {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
        })
    }

    /// Junction rows for one page of keywords, bulk-fetched with one query
    /// per level.
    async fn page_relations(
        &self,
        owner: &str,
        page_ids: &[i32],
        active_companies: &HashSet<i32>,
        active_campaigns: &HashSet<i32>,
        active_groups: &HashSet<i32>,
    ) -> AppResult<HashMap<i32, KeywordRelations>> {
        let mut map: HashMap<i32, KeywordRelations> = HashMap::new();
        if page_ids.is_empty() {
            return Ok(map);
        }

        if !active_companies.is_empty() {
            let ids: Vec<i32> = active_companies.iter().copied().collect();
            for link in self.repo.company_links_for(owner, page_ids, &ids).await? {
                map.entry(link.keyword_id)
                    .or_default()
                    .companies
                    .insert(link.company_id, MatchFlags::from(&link));
            }
        }
        if !active_campaigns.is_empty() {
            let ids: Vec<i32> = active_campaigns.iter().copied().collect();
            for link in self.repo.ad_campaign_links_for(owner, page_ids, &ids).await? {
                map.entry(link.keyword_id)
                    .or_default()
                    .ad_campaigns
                    .insert(link.ad_campaign_id, MatchFlags::from(&link));
            }
        }
        if !active_groups.is_empty() {
            let ids: Vec<i32> = active_groups.iter().copied().collect();
            for link in self.repo.ad_group_links_for(owner, page_ids, &ids).await? {
                map.entry(link.keyword_id)
                    .or_default()
                    .ad_groups
                    .insert(link.ad_group_id, MatchFlags::from(&link));
            }
        }

        Ok(map)
    }

    fn clamp_batch(&self, batch_size: Option<u64>) -> usize {
        batch_size
            .unwrap_or(self.limits.batch_size)
            .clamp(1, self.limits.max_page_size) as usize
    }

    fn check_request_cap(&self, keyword_ids: &[i32]) -> AppResult<()> {
        if keyword_ids.len() > self.limits.max_keywords_per_request {
            return Err(AppError::BadRequest(format!(
                "At most {} keyword ids per request",
                self.limits.max_keywords_per_request
            )));
        }
        Ok(())
    }

    async fn check_keyword_ownership(&self, owner: &str, keyword_ids: &[i32]) -> AppResult<()> {
        let unique: HashSet<i32> = keyword_ids.iter().copied().collect();
        let found = self
            .repo
            .find_owned_many(owner, keyword_ids)
            .await?
            .into_iter()
            .map(|kw| kw.id)
            .collect::<HashSet<_>>();

        let mut missing: Vec<i32> = unique.difference(&found).copied().collect();
        if missing.is_empty() {
            Ok(())
        } else {
            missing.sort_unstable();
            Err(AppError::NotFound(format!(
                "Keywords not found: {missing:?}"
            )))
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

/// Applies the in-memory matrix filters to the DB-filtered keyword set.
///
/// `presence` spans every junction row of the owner; `active_attached` holds
/// the keywords linked to at least one active entity. Keywords unattached to
/// any active entity are dropped only while the owner has active entities.
fn collect_matrix_rows(
    keywords: Vec<keyword::Model>,
    presence: &HashMap<i32, MatchPresence>,
    active_attached: &HashSet<i32>,
    has_active_entities: bool,
    query: &KeywordMatrixQuery,
) -> Vec<(keyword::Model, MatchPresence)> {
    keywords
        .into_iter()
        .filter_map(|kw| {
            if has_active_entities && !active_attached.contains(&kw.id) {
                return None;
            }
            if query.only_attached && !presence.contains_key(&kw.id) {
                return None;
            }
            let p = presence.get(&kw.id).copied().unwrap_or_default();
            query.presence.matches(p).then_some((kw, p))
        })
        .collect()
}

const DEFAULT_SORT: &[(KeywordSortField, SortOrder)] =
    &[(KeywordSortField::Created, SortOrder::Desc)];

/// Newest first unless the client asked for an explicit ordering.
fn sort_keys(keys: &[(KeywordSortField, SortOrder)]) -> &[(KeywordSortField, SortOrder)] {
    if keys.is_empty() { DEFAULT_SORT } else { keys }
}

fn compare_matrix_rows(
    a: &(keyword::Model, MatchPresence),
    b: &(keyword::Model, MatchPresence),
    keys: &[(KeywordSortField, SortOrder)],
) -> Ordering {
    for &(field, order) in keys {
        let ord = match field {
            KeywordSortField::Id => a.0.id.cmp(&b.0.id),
            KeywordSortField::Keyword => a.0.keyword.cmp(&b.0.keyword),
            KeywordSortField::Created => a.0.created.cmp(&b.0.created),
            KeywordSortField::Updated => a.0.updated.cmp(&b.0.updated),
            _ => a.1.field(field).cmp(&b.1.field(field)),
        };
        let ord = match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.0.id.cmp(&b.0.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn kw(id: i32, text: &str) -> keyword::Model {
        let now = chrono::Utc::now().fixed_offset();
        keyword::Model {
            id,
            keyword: text.to_string(),
            clerk_user_id: "user_a".to_string(),
            created: now,
            updated: now,
        }
    }

    fn presence(has_broad: bool) -> MatchPresence {
        MatchPresence {
            has_broad,
            ..Default::default()
        }
    }

    fn kw_created(
        id: i32,
        text: &str,
        created: chrono::DateTime<chrono::FixedOffset>,
    ) -> keyword::Model {
        keyword::Model {
            id,
            keyword: text.to_string(),
            clerk_user_id: "user_a".to_string(),
            created,
            updated: created,
        }
    }

    #[test]
    fn test_only_attached_counts_inactive_entity_links() {
        // Keyword 1 is linked only to an inactive company; the attachment
        // still counts for only_attached.
        let mut presence_map = HashMap::new();
        presence_map.insert(1, presence(true));
        let query = KeywordMatrixQuery {
            only_attached: true,
            ..Default::default()
        };

        let rows = collect_matrix_rows(
            vec![kw(1, "alpha"), kw(2, "beta")],
            &presence_map,
            &HashSet::new(),
            false,
            &query,
        );
        let ids: Vec<i32> = rows.iter().map(|(k, _)| k.id).collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn test_has_flag_filter_spans_inactive_entity_links() {
        // The broad flag sits on a link to an inactive company; the keyword
        // stays in the listing through a flagless link to an active entity.
        let mut presence_map = HashMap::new();
        presence_map.insert(1, presence(true));
        let active_attached: HashSet<i32> = [1].into_iter().collect();
        let query = KeywordMatrixQuery {
            presence: PresenceFilters {
                has_broad: Some(true),
                ..Default::default()
            },
            ..Default::default()
        };

        let rows = collect_matrix_rows(
            vec![kw(1, "alpha")],
            &presence_map,
            &active_attached,
            true,
            &query,
        );
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_active_entities_drop_unattached_keywords() {
        let mut presence_map = HashMap::new();
        presence_map.insert(1, presence(false));

        let rows = collect_matrix_rows(
            vec![kw(1, "alpha")],
            &presence_map,
            &HashSet::new(),
            true,
            &KeywordMatrixQuery::default(),
        );
        assert!(rows.is_empty());
    }

    #[test]
    fn test_default_sort_is_created_desc() {
        let base = chrono::Utc::now().fixed_offset();
        let mut rows = vec![
            (kw_created(1, "older", base), presence(false)),
            (
                kw_created(2, "newer", base + chrono::Duration::seconds(60)),
                presence(false),
            ),
        ];

        let keys = sort_keys(&[]);
        rows.sort_by(|a, b| compare_matrix_rows(a, b, keys));
        let ids: Vec<i32> = rows.iter().map(|(k, _)| k.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_sort_desc_puts_flagged_first() {
        let mut rows = vec![
            (kw(1, "alpha"), presence(false)),
            (kw(2, "beta"), presence(true)),
            (kw(3, "gamma"), presence(false)),
        ];
        rows.sort_by(|a, b| {
            compare_matrix_rows(a, b, &[(KeywordSortField::HasBroad, SortOrder::Desc)])
        });
        let ids: Vec<i32> = rows.iter().map(|(k, _)| k.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_three_levels_with_id_tiebreak() {
        let mut rows = vec![
            (kw(3, "same"), presence(true)),
            (kw(1, "same"), presence(true)),
            (kw(2, "other"), presence(true)),
        ];
        rows.sort_by(|a, b| {
            compare_matrix_rows(
                a,
                b,
                &[
                    (KeywordSortField::HasBroad, SortOrder::Desc),
                    (KeywordSortField::Keyword, SortOrder::Asc),
                ],
            )
        });
        let ids: Vec<i32> = rows.iter().map(|(k, _)| k.id).collect();
        // "other" before "same", then id ascending within equal keys
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_presence_filter() {
        let filters = PresenceFilters {
            has_broad: Some(true),
            has_exact: Some(false),
            ..Default::default()
        };
        assert!(filters.matches(presence(true)));
        assert!(!filters.matches(presence(false)));
        assert!(!filters.matches(MatchPresence {
            has_broad: true,
            has_exact: true,
            ..Default::default()
        }));
    }

    #[test]
    fn test_presence_absorb_is_monotonic() {
        let mut p = MatchPresence::default();
        p.absorb(MatchFlags {
            broad: true,
            ..Default::default()
        });
        p.absorb(MatchFlags::default());
        assert!(p.has_broad);
        assert!(!p.has_phrase);
    }
}
