//! API endpoints.

mod ad_campaigns;
mod ad_groups;
mod companies;
mod filters;
mod keywords;
mod relations;

use axum::{Json, Router, extract::State, routing::get};
use kplanner_common::{AppError, AppResult};
use serde::Serialize;

use crate::middleware::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .nest("/companies", companies::router())
        .nest("/ad_campaigns", ad_campaigns::router())
        .nest("/ad_groups", ad_groups::router())
        .nest("/keywords", keywords::router())
        .nest("/filters", filters::router())
        .nest("/relations", relations::router())
}

/// Service banner.
#[derive(Debug, Serialize)]
struct RootResponse {
    name: &'static str,
    mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    demo_user_id: Option<String>,
}

async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    let dev = state.auth_service.dev_mode();
    Json(RootResponse {
        name: "kplanner",
        mode: if dev { "development" } else { "production" },
        demo_user_id: dev.then(|| state.auth_service.demo_user_id().to_string()),
    })
}

/// Bulk delete request shared by the id-list delete endpoints.
#[derive(Debug, serde::Deserialize)]
pub struct BulkDeleteRequest {
    pub ids: Vec<i32>,
}

/// Reject empty id lists on the bulk endpoints.
pub(crate) fn require_ids(ids: &[i32]) -> AppResult<()> {
    if ids.is_empty() {
        return Err(AppError::BadRequest("ids must not be empty".to_string()));
    }
    Ok(())
}

/// Distinguish an absent field from an explicit `null`.
///
/// With `#[serde(default)]`, a missing field stays `None` while `null`
/// becomes `Some(None)`, so parent ids can be detached explicitly.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    serde::Deserialize::deserialize(de).map(Some)
}
