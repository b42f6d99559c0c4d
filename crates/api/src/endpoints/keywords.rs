//! Keyword endpoints.
//!
//! Bulk creation and relation fan-out, the matrix listing, and single-row
//! operations.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use kplanner_common::{AppError, AppResult};
use kplanner_core::services::keyword::{
    KeywordMatrixItem, KeywordMatrixQuery, KeywordSortField, PresenceFilters,
};
use kplanner_core::services::BulkDeleteOutcome;
use kplanner_db::entities::keyword;
use kplanner_db::repositories::SortOrder;
use kplanner_db::repositories::keyword::{
    KeywordListFilter, MatchFlags, MatchOverrides, RelationTargets,
};
use serde::Deserialize;

use crate::endpoints::companies::default_page;
use crate::endpoints::{BulkDeleteRequest, require_ids};
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::{
    BulkWriteResponse, ListResponse, ObjectResponse, Pagination, RelationsUpdatedResponse,
};

/// Bulk create keywords request.
#[derive(Debug, Deserialize)]
pub struct BulkCreateKeywordsRequest {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub match_types: MatchFlags,
    #[serde(default)]
    pub overrides: MatchOverrides,
    #[serde(default)]
    pub company_ids: Vec<i32>,
    #[serde(default)]
    pub ad_campaign_ids: Vec<i32>,
    #[serde(default)]
    pub ad_group_ids: Vec<i32>,
}

/// Attach existing keywords request.
#[derive(Debug, Deserialize)]
pub struct AttachRelationsRequest {
    pub keyword_ids: Vec<i32>,
    #[serde(default)]
    pub match_types: MatchFlags,
    #[serde(default)]
    pub overrides: MatchOverrides,
    #[serde(default)]
    pub company_ids: Vec<i32>,
    #[serde(default)]
    pub ad_campaign_ids: Vec<i32>,
    #[serde(default)]
    pub ad_group_ids: Vec<i32>,
}

/// Update existing junction rows request.
#[derive(Debug, Deserialize)]
pub struct UpdateRelationsRequest {
    pub keyword_ids: Vec<i32>,
    #[serde(default)]
    pub match_types: MatchFlags,
    #[serde(default)]
    pub overrides: MatchOverrides,
}

/// Rename keyword request.
#[derive(Debug, Deserialize)]
pub struct UpdateKeywordRequest {
    pub keyword: String,
}

/// Batch size query parameter for the bulk create endpoint.
#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    pub batch_size: Option<u64>,
}

/// Matrix listing query parameters.
///
/// Three sort levels are expressed as `sort_by`/`sort_order`,
/// `sort_by2`/`sort_order2`, `sort_by3`/`sort_order3`.
#[derive(Debug, Deserialize)]
pub struct MatrixQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    pub page_size: Option<u64>,
    pub search: Option<String>,
    pub created_after: Option<DateTime<FixedOffset>>,
    pub created_before: Option<DateTime<FixedOffset>>,
    pub updated_after: Option<DateTime<FixedOffset>>,
    pub updated_before: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub only_attached: bool,
    pub has_broad: Option<bool>,
    pub has_phrase: Option<bool>,
    pub has_exact: Option<bool>,
    pub has_neg_broad: Option<bool>,
    pub has_neg_phrase: Option<bool>,
    pub has_neg_exact: Option<bool>,
    pub sort_by: Option<KeywordSortField>,
    pub sort_order: Option<SortOrder>,
    pub sort_by2: Option<KeywordSortField>,
    pub sort_order2: Option<SortOrder>,
    pub sort_by3: Option<KeywordSortField>,
    pub sort_order3: Option<SortOrder>,
}

impl MatrixQuery {
    fn into_matrix_query(self) -> KeywordMatrixQuery {
        let mut sort = Vec::new();
        for (field, order) in [
            (self.sort_by, self.sort_order),
            (self.sort_by2, self.sort_order2),
            (self.sort_by3, self.sort_order3),
        ] {
            if let Some(field) = field {
                sort.push((field, order.unwrap_or_default()));
            }
        }

        KeywordMatrixQuery {
            filter: KeywordListFilter {
                search: self.search,
                created_after: self.created_after,
                created_before: self.created_before,
                updated_after: self.updated_after,
                updated_before: self.updated_before,
            },
            only_attached: self.only_attached,
            presence: PresenceFilters {
                has_broad: self.has_broad,
                has_phrase: self.has_phrase,
                has_exact: self.has_exact,
                has_neg_broad: self.has_neg_broad,
                has_neg_phrase: self.has_neg_phrase,
                has_neg_exact: self.has_neg_exact,
            },
            sort,
        }
    }
}

fn targets(company_ids: Vec<i32>, ad_campaign_ids: Vec<i32>, ad_group_ids: Vec<i32>) -> RelationTargets {
    RelationTargets {
        company_ids,
        ad_campaign_ids,
        ad_group_ids,
    }
}

/// Create the keyword router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(matrix))
        .route("/bulk", post(bulk_create))
        .route("/bulk/relations", post(attach_relations).put(update_relations))
        .route("/bulk/delete", post(bulk_delete))
        .route("/{id}", get(show))
        .route("/{id}/update", post(update))
}

/// Bulk-create keywords and attach them to target entities.
async fn bulk_create(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Query(batch): Query<BatchQuery>,
    Json(req): Json<BulkCreateKeywordsRequest>,
) -> AppResult<BulkWriteResponse> {
    if req.keywords.is_empty() {
        return Err(AppError::BadRequest(
            "keywords must not be empty".to_string(),
        ));
    }

    let targets = targets(req.company_ids, req.ad_campaign_ids, req.ad_group_ids);
    let (outcome, batches) = state
        .keyword_service
        .bulk_create(
            &owner,
            &req.keywords,
            &targets,
            req.match_types,
            req.overrides,
            batch.batch_size,
        )
        .await?;

    Ok(BulkWriteResponse::created(outcome, batches))
}

/// Attach existing keywords to target entities.
async fn attach_relations(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AttachRelationsRequest>,
) -> AppResult<BulkWriteResponse> {
    require_ids(&req.keyword_ids)?;

    let targets = targets(req.company_ids, req.ad_campaign_ids, req.ad_group_ids);
    let (outcome, batches) = state
        .keyword_service
        .attach_relations(
            &owner,
            &req.keyword_ids,
            &targets,
            req.match_types,
            req.overrides,
        )
        .await?;

    Ok(BulkWriteResponse::new(outcome, batches))
}

/// Update existing junction rows of the given keywords.
async fn update_relations(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateRelationsRequest>,
) -> AppResult<RelationsUpdatedResponse> {
    require_ids(&req.keyword_ids)?;

    let relations_updated = state
        .keyword_service
        .update_relations(&owner, &req.keyword_ids, req.match_types, req.overrides)
        .await?;

    Ok(RelationsUpdatedResponse { relations_updated })
}

/// The keyword matrix listing.
async fn matrix(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Query(q): Query<MatrixQuery>,
) -> AppResult<ListResponse<KeywordMatrixItem>> {
    let page = q.page;
    let page_size = q.page_size;
    let query = q.into_matrix_query();

    let result = state
        .keyword_service
        .matrix(&owner, &query, page, page_size)
        .await?;

    Ok(ListResponse {
        pagination: Pagination::new(result.page, result.page_size, result.total),
        items: result.items,
    })
}

/// Fetch one keyword.
async fn show(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ObjectResponse<keyword::Model>> {
    let model = state.keyword_service.get(&owner, id).await?;
    Ok(ObjectResponse::ok(model))
}

/// Rename a keyword.
async fn update(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateKeywordRequest>,
) -> AppResult<ObjectResponse<keyword::Model>> {
    let model = state
        .keyword_service
        .update_text(&owner, id, &req.keyword)
        .await?;
    Ok(ObjectResponse::ok(model))
}

/// Delete keywords by id list.
async fn bulk_delete(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state.keyword_service.bulk_delete(&owner, &req.ids).await?;
    Ok(ObjectResponse::ok(outcome))
}
