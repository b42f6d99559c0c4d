//! Company endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use chrono::{DateTime, FixedOffset};
use kplanner_common::{AppError, AppResult};
use kplanner_core::services::BulkDeleteOutcome;
use kplanner_db::entities::company;
use kplanner_db::repositories::SortOrder;
use kplanner_db::repositories::company::{CompanyListQuery, CompanySortBy};
use serde::Deserialize;
use validator::Validate;

use crate::endpoints::{BulkDeleteRequest, require_ids};
use crate::extractors::AuthUser;
use crate::middleware::AppState;
use crate::response::{ListResponse, ObjectResponse, Pagination};

/// Create company request.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[serde(default)]
    pub is_active: bool,
}

/// Update company request.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    pub is_active: Option<bool>,
}

/// List companies query parameters.
#[derive(Debug, Deserialize)]
pub struct ListCompaniesQuery {
    #[serde(default = "default_page")]
    pub page: u64,
    pub page_size: Option<u64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    pub created_after: Option<DateTime<FixedOffset>>,
    pub created_before: Option<DateTime<FixedOffset>>,
    pub updated_after: Option<DateTime<FixedOffset>>,
    pub updated_before: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub sort_by: CompanySortBy,
    #[serde(default)]
    pub sort_order: SortOrder,
}

pub(crate) const fn default_page() -> u64 {
    1
}

/// Create the company router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create).get(list))
        .route("/{id}", get(show))
        .route("/{id}/update", post(update))
        .route("/{id}/toggle", post(toggle))
        .route("/bulk/delete", post(bulk_delete))
}

/// Create a company.
async fn create(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateCompanyRequest>,
) -> AppResult<ObjectResponse<company::Model>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (model, message) = state
        .company_service
        .create(&owner, &req.title, req.is_active)
        .await?;

    Ok(ObjectResponse::created(model, message))
}

/// List the owner's companies.
async fn list(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Query(q): Query<ListCompaniesQuery>,
) -> AppResult<ListResponse<company::Model>> {
    let query = CompanyListQuery {
        search: q.search,
        is_active: q.is_active,
        created_after: q.created_after,
        created_before: q.created_before,
        updated_after: q.updated_after,
        updated_before: q.updated_before,
        sort_by: q.sort_by,
        sort_order: q.sort_order,
    };

    let (items, total, page) = state
        .company_service
        .list(&owner, &query, q.page, q.page_size)
        .await?;

    Ok(ListResponse {
        items,
        pagination: Pagination::new(page.page, page.page_size, total),
    })
}

/// Fetch one company.
async fn show(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ObjectResponse<company::Model>> {
    let model = state.company_service.get(&owner, id).await?;
    Ok(ObjectResponse::ok(model))
}

/// Update a company.
async fn update(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateCompanyRequest>,
) -> AppResult<ObjectResponse<company::Model>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let (model, message) = state
        .company_service
        .update(&owner, id, req.title.as_deref(), req.is_active)
        .await?;

    Ok(ObjectResponse::with_message(model, message))
}

/// Flip a company's active state.
async fn toggle(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<ObjectResponse<company::Model>> {
    let model = state.company_service.toggle(&owner, id).await?;
    Ok(ObjectResponse::ok(model))
}

/// Delete companies by id list.
async fn bulk_delete(
    AuthUser(owner): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BulkDeleteRequest>,
) -> AppResult<ObjectResponse<BulkDeleteOutcome>> {
    require_ids(&req.ids)?;
    let outcome = state.company_service.bulk_delete(&owner, &req.ids).await?;
    Ok(ObjectResponse::ok(outcome))
}
