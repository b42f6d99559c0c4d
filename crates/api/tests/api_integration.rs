//! API integration tests.
//!
//! These tests exercise the router, auth middleware, and handlers against a
//! mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use kplanner_api::{auth_middleware, middleware::AppState, router as api_router};
use kplanner_common::config::{AuthConfig, LimitsConfig};
use kplanner_core::{
    AdCampaignService, AdGroupService, AuthService, CompanyService, FilterService, KeywordService,
};
use kplanner_db::entities::company;
use kplanner_db::repositories::{
    AdCampaignRepository, AdGroupRepository, CompanyRepository, FilterRepository,
    KeywordRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use tower::ServiceExt;

fn auth_config(dev_mode: bool) -> AuthConfig {
    AuthConfig {
        dev_mode,
        demo_user_id: "clerk_demo_user".to_string(),
        jwt_secret: Some("test-secret".to_string()),
        session_cookie: "__session".to_string(),
    }
}

fn test_state(db: DatabaseConnection, dev_mode: bool) -> AppState {
    let db = Arc::new(db);
    let limits = LimitsConfig::default();

    let company_repo = CompanyRepository::new(Arc::clone(&db));
    let ad_campaign_repo = AdCampaignRepository::new(Arc::clone(&db));
    let ad_group_repo = AdGroupRepository::new(Arc::clone(&db));
    let keyword_repo = KeywordRepository::new(Arc::clone(&db));
    let filter_repo = FilterRepository::new(Arc::clone(&db));

    AppState {
        company_service: CompanyService::new(company_repo.clone(), limits.clone()),
        ad_campaign_service: AdCampaignService::new(
            ad_campaign_repo.clone(),
            company_repo.clone(),
            limits.clone(),
        ),
        ad_group_service: AdGroupService::new(
            ad_group_repo.clone(),
            ad_campaign_repo.clone(),
            limits.clone(),
        ),
        keyword_service: KeywordService::new(
            keyword_repo,
            company_repo.clone(),
            ad_campaign_repo.clone(),
            ad_group_repo.clone(),
            limits.clone(),
        ),
        filter_service: FilterService::new(
            filter_repo,
            company_repo,
            ad_campaign_repo,
            ad_group_repo,
            limits,
        ),
        auth_service: AuthService::new(auth_config(dev_mode)),
    }
}

fn test_router(state: AppState) -> Router {
    api_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn empty_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_root_banner_in_dev_mode() {
    let app = test_router(test_state(empty_mock_db(), true));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("development"));
    assert!(body.contains("clerk_demo_user"));
}

#[tokio::test]
async fn test_root_banner_hides_demo_user_in_production() {
    let app = test_router(test_state(empty_mock_db(), false));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("production"));
    assert!(!body.contains("clerk_demo_user"));
}

#[tokio::test]
async fn test_unauthenticated_request_is_rejected() {
    let app = test_router(test_state(empty_mock_db(), false));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/companies/1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_company() {
    let now = chrono::Utc::now().fixed_offset();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[company::Model {
            id: 1,
            title: "Acme".to_string(),
            clerk_user_id: "clerk_demo_user".to_string(),
            is_active: false,
            created: now,
            updated: now,
        }]])
        .append_exec_results([sea_orm::MockExecResult {
            last_insert_id: 1,
            rows_affected: 1,
        }])
        .into_connection();
    let app = test_router(test_state(db, true));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/companies")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"title":"Acme"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_string(response).await;
    assert!(body.contains("\"title\":\"Acme\""));
}

#[tokio::test]
async fn test_create_company_rejects_empty_title() {
    let app = test_router(test_state(empty_mock_db(), true));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/companies")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"title":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_show_company_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<company::Model>::new()])
        .into_connection();
    let app = test_router(test_state(db, true));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/companies/42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_string(response).await;
    assert!(body.contains("NOT_FOUND"));
}

#[tokio::test]
async fn test_bulk_delete_rejects_empty_ids() {
    let app = test_router(test_state(empty_mock_db(), true));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/companies/bulk/delete")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"ids":[]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_bulk_create_keywords_rejects_empty_list() {
    let app = test_router(test_state(empty_mock_db(), true));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/keywords/bulk")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"keywords":[]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_relations_rejects_oversized_request() {
    let app = test_router(test_state(empty_mock_db(), true));

    let ids: Vec<i32> = (1..=101).collect();
    let body = serde_json::json!({ "keyword_ids": ids, "match_types": { "broad": true } });

    let response = app
        .oneshot(
            Request::builder()
                .uri("/keywords/bulk/relations")
                .method("PUT")
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_relations_delete_route_exists() {
    // Exec with zero rows affected, then ownership-scoped delete
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([sea_orm::MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();
    let app = test_router(test_state(db, true));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/relations/company_keyword/bulk/delete")
                .method("POST")
                .header("Content-Type", "application/json")
                .body(Body::from(r#"{"ids":[1,2]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("\"deleted\":0"));
}
