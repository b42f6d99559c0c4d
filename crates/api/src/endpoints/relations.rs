//! Junction-row delete endpoints.
//!
//! Each route removes rows from one of the six junction tables by junction
//! id, scoped to the owner.

use axum::{Json, Router, extract::State, routing::post};
use kplanner_common::AppResult;
use kplanner_core::services::BulkDeleteOutcome;

use crate::endpoints::{BulkDeleteRequest, require_ids};
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::ObjectResponse;

/// Create the relations router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/company_keyword/bulk/delete", post(delete_company_keyword))
        .route(
            "/ad_campaign_keyword/bulk/delete",
            post(delete_ad_campaign_keyword),
        )
        .route(
            "/ad_group_keyword/bulk/delete",
            post(delete_ad_group_keyword),
        )
        .route("/company_filter/bulk/delete", post(delete_company_filter))
        .route(
            "/ad_campaign_filter/bulk/delete",
            post(delete_ad_campaign_filter),
        )
        .route("/ad_group_filter/bulk/delete", post(delete_ad_group_filter))
}

async fn delete_company_keyword(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state
        .keyword_service
        .delete_company_relations(&owner, &req.ids)
        .await?;
    Ok(ObjectResponse::ok(outcome))
}

async fn delete_ad_campaign_keyword(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state
        .keyword_service
        .delete_ad_campaign_relations(&owner, &req.ids)
        .await?;
    Ok(ObjectResponse::ok(outcome))
}

async fn delete_ad_group_keyword(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state
        .keyword_service
        .delete_ad_group_relations(&owner, &req.ids)
        .await?;
    Ok(ObjectResponse::ok(outcome))
}

async fn delete_company_filter(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state
        .filter_service
        .delete_company_relations(&owner, &req.ids)
        .await?;
    Ok(ObjectResponse::ok(outcome))
}

async fn delete_ad_campaign_filter(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state
        .filter_service
        .delete_ad_campaign_relations(&owner, &req.ids)
        .await?;
    Ok(ObjectResponse::ok(outcome))
}

async fn delete_ad_group_filter(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state
        .filter_service
        .delete_ad_group_relations(&owner, &req.ids)
        .await?;
    Ok(ObjectResponse::ok(outcome))
}
