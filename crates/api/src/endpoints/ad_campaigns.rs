//! Ad campaign endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use kplanner_common::{AppError, AppResult};
use kplanner_core::services::BulkDeleteOutcome;
use kplanner_db::entities::ad_campaign;
use kplanner_db::repositories::SortOrder;
use kplanner_db::repositories::ad_campaign::{AdCampaignListQuery, AdCampaignSortBy};
use serde::Deserialize;
use validator::Validate;

use crate::endpoints::companies::default_page;
use crate::endpoints::{BulkDeleteRequest, double_option, require_ids};
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::{ListResponse, ObjectResponse, Pagination};

/// Create ad campaign request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAdCampaignRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    pub company_id: Option<i32>,
    #[serde(default)]
    pub is_active: bool,
}

/// Update ad campaign request.
///
/// `company_id` distinguishes "leave alone" (absent) from "detach" (null).
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateAdCampaignRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub company_id: Option<Option<i32>>,
    pub is_active: Option<bool>,
}

/// List ad campaigns query parameters.
#[derive(Debug, Deserialize)]
pub struct ListAdCampaignsQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    pub page_size: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub company_id: Option<i32>,
    pub created_after: Option<DateTime<FixedOffset>>,
    pub created_before: Option<DateTime<FixedOffset>>,
    pub updated_after: Option<DateTime<FixedOffset>>,
    pub updated_before: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub sort_by: AdCampaignSortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

/// Create the ad campaign router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/{id}", get(show))
        .route("/{id}/update", post(update))
        .route("/{id}/toggle", post(toggle))
        .route("/bulk/delete", post(bulk_delete))
}

/// Create an ad campaign.
async fn create(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateAdCampaignRequest>,
) -> AppResult<ObjectResponse<ad_campaign::Model>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (model, message) = state
        .ad_campaign_service
        .create(&owner, &req.title, req.company_id, req.is_active)
        .await?;

    Ok(ObjectResponse::created(model, message))
}

/// List the owner's ad campaigns.
async fn list(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Query(q): Query<ListAdCampaignsQuery>,
) -> AppResult<ListResponse<ad_campaign::Model>> {
    let query = AdCampaignListQuery {
        search: q.search,
        is_active: q.is_active,
        company_id: q.company_id,
        created_after: q.created_after,
        created_before: q.created_before,
        updated_after: q.updated_after,
        updated_before: q.updated_before,
        sort_by: q.sort_by,
        sort_order: q.sort_order,
    };

    let (items, total, page) = state
        .ad_campaign_service
        .list(&owner, &query, q.page, q.page_size)
        .await?;

    Ok(ListResponse {
        items,
        pagination: Pagination::new(page.page, page.page_size, total),
    })
}

/// Fetch one ad campaign.
async fn show(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ObjectResponse<ad_campaign::Model>> {
    let model = state.ad_campaign_service.get(&owner, id).await?;
    Ok(ObjectResponse::ok(model))
}

/// Update an ad campaign.
async fn update(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateAdCampaignRequest>,
) -> AppResult<ObjectResponse<ad_campaign::Model>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (model, message) = state
        .ad_campaign_service
        .update(&owner, id, req.title.as_deref(), req.company_id, req.is_active)
        .await?;

    Ok(ObjectResponse::with_message(model, message))
}

/// Flip an ad campaign's active state.
async fn toggle(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ObjectResponse<ad_campaign::Model>> {
    let model = state.ad_campaign_service.toggle(&owner, id).await?;
    Ok(ObjectResponse::ok(model))
}

/// Delete ad campaigns by id list.
async fn bulk_delete(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state
        .ad_campaign_service
        .bulk_delete(&owner, &req.ids)
        .await?;
    Ok(ObjectResponse::ok(outcome))
}
