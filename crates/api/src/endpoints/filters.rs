//! Filter word endpoints.
//!
//! Mirrors the keyword endpoints with a single `is_negative` flag per
//! junction row and a database-side paginated listing.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use kplanner_common::{AppError, AppResult};
use kplanner_core::services::BulkDeleteOutcome;
use kplanner_db::entities::filter;
use kplanner_db::repositories::SortOrder;
use kplanner_db::repositories::filter::{FilterListQuery, FilterSortBy};
use kplanner_db::repositories::keyword::RelationTargets;
use serde::Deserialize;

use crate::endpoints::companies::default_page;
use crate::endpoints::{BulkDeleteRequest, require_ids};
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::{
    BulkWriteResponse, ListResponse, ObjectResponse, Pagination, RelationsUpdatedResponse,
};

/// Bulk create filter words request.
#[derive(Debug, Deserialize)]
pub struct BulkCreateFiltersRequest {
    pub words: Vec<String>,
    #[serde(default)]
    pub is_negative: bool,
    #[serde(default)]
    pub override_is_negative: bool,
    #[serde(default)]
    pub company_ids: Vec<i32>,
    #[serde(default)]
    pub ad_campaign_ids: Vec<i32>,
    #[serde(default)]
    pub ad_group_ids: Vec<i32>,
}

/// Attach existing filter words request.
#[derive(Debug, Deserialize)]
pub struct AttachFilterRelationsRequest {
    pub filter_ids: Vec<i32>,
    #[serde(default)]
    pub is_negative: bool,
    #[serde(default)]
    pub override_is_negative: bool,
    #[serde(default)]
    pub company_ids: Vec<i32>,
    #[serde(default)]
    pub ad_campaign_ids: Vec<i32>,
    #[serde(default)]
    pub ad_group_ids: Vec<i32>,
}

/// Update existing filter junction rows request.
#[derive(Debug, Deserialize)]
pub struct UpdateFilterRelationsRequest {
    pub filter_ids: Vec<i32>,
    #[serde(default)]
    pub is_negative: bool,
    #[serde(default)]
    pub override_is_negative: bool,
}

/// Rename filter word request.
#[derive(Debug, Deserialize)]
pub struct UpdateFilterRequest {
    pub word: String,
}

/// Batch size query parameter for the bulk create endpoint.
#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    pub batch_size: Option<u64>,
}

/// List filter words query parameters.
#[derive(Debug, Deserialize)]
pub struct ListFiltersQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    pub page_size: Option<u64>,
    pub search: Option<String>,
    pub created_after: Option<DateTime<FixedOffset>>,
    pub created_before: Option<DateTime<FixedOffset>>,
    pub updated_after: Option<DateTime<FixedOffset>>,
    pub updated_before: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub sort_by: FilterSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

/// Create the filter router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/bulk", post(bulk_create))
        .route("/bulk/relations", post(attach_relations).put(update_relations))
        .route("/bulk/delete", post(bulk_delete))
        .route("/{id}", get(show))
        .route("/{id}/update", post(update))
}

/// Bulk-create filter words and attach them to target entities.
async fn bulk_create(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Query(batch): Query<BatchQuery>,
    Json(req): Json<BulkCreateFiltersRequest>,
) -> AppResult<BulkWriteResponse> {
    if req.words.is_empty() {
        return Err(AppError::BadRequest("words must not be empty".to_string()));
    }

    let targets = RelationTargets {
        company_ids: req.company_ids,
        ad_campaign_ids: req.ad_campaign_ids,
        ad_group_ids: req.ad_group_ids,
    };
    let (outcome, batches) = state
        .filter_service
        .bulk_create(
            &owner,
            &req.words,
            &targets,
            req.is_negative,
            req.override_is_negative,
            batch.batch_size,
        )
        .await?;

    Ok(BulkWriteResponse::created(outcome, batches))
}

/// Attach existing filter words to target entities.
async fn attach_relations(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<AttachFilterRelationsRequest>,
) -> AppResult<BulkWriteResponse> {
    require_ids(&req.filter_ids)?;

    let targets = RelationTargets {
        company_ids: req.company_ids,
        ad_campaign_ids: req.ad_campaign_ids,
        ad_group_ids: req.ad_group_ids,
    };
    let (outcome, batches) = state
        .filter_service
        .attach_relations(
            &owner,
            &req.filter_ids,
            &targets,
            req.is_negative,
            req.override_is_negative,
        )
        .await?;

    Ok(BulkWriteResponse::new(outcome, batches))
}

/// Update existing junction rows of the given filter words.
async fn update_relations(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateFilterRelationsRequest>,
) -> AppResult<RelationsUpdatedResponse> {
    require_ids(&req.filter_ids)?;

    let relations_updated = state
        .filter_service
        .update_relations(
            &owner,
            &req.filter_ids,
            req.is_negative,
            req.override_is_negative,
        )
        .await?;

    Ok(RelationsUpdatedResponse { relations_updated })
}

/// List the owner's filter words.
async fn list(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Query(q): Query<ListFiltersQuery>,
) -> AppResult<ListResponse<filter::Model>> {
    let query = FilterListQuery {
        search: q.search,
        created_after: q.created_after,
        created_before: q.created_before,
        updated_after: q.updated_after,
        updated_before: q.updated_before,
        sort_by: q.sort_by,
        sort_order: q.sort_order,
    };

    let (items, total, page) = state
        .filter_service
        .list(&owner, &query, q.page, q.page_size)
        .await?;

    Ok(ListResponse {
        items,
        pagination: Pagination::new(page.page, page.page_size, total),
    })
}

/// Fetch one filter word.
async fn show(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ObjectResponse<filter::Model>> {
    let model = state.filter_service.get(&owner, id).await?;
    Ok(ObjectResponse::ok(model))
}

/// Rename a filter word.
async fn update(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateFilterRequest>,
) -> AppResult<ObjectResponse<filter::Model>> {
    let model = state
        .filter_service
        .update_word(&owner, id, &req.word)
        .await?;
    Ok(ObjectResponse::ok(model))
}

/// Delete filter words by id list.
async fn bulk_delete(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state.filter_service.bulk_delete(&owner, &req.ids).await?;
    Ok(ObjectResponse::ok(outcome))
}
