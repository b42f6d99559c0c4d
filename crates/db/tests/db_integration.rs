//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `kplanner_test`)
//!   `TEST_DB_PASSWORD` (default: `kplanner_test`)
//!   `TEST_DB_NAME` (default: `kplanner_test`)

#![allow(clippy::unwrap_used)]

use kplanner_db::entities::company;
use kplanner_db::repositories::keyword::{MatchFlags, MatchOverrides, RelationTargets};
use kplanner_db::repositories::{CompanyRepository, KeywordRepository};
use kplanner_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::ActiveValue::Set;

const OWNER: &str = "clerk_test_owner";

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_company_crud_roundtrip() {
    let db = TestDatabase::create_unique().await.expect("create db");
    let conn = db.connection();
    let repo = CompanyRepository::new(conn);

    let created = repo
        .create(company::ActiveModel {
            title: Set("Acme".to_string()),
            clerk_user_id: Set(OWNER.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.title, "Acme");
    assert!(!created.is_active);

    let fetched = repo.find_owned(created.id, OWNER).await.unwrap();
    assert!(fetched.is_some());

    // Other owners cannot see the row
    let hidden = repo.find_owned(created.id, "someone_else").await.unwrap();
    assert!(hidden.is_none());

    let deleted = repo.bulk_delete(OWNER, &[created.id], 25).await.unwrap();
    assert_eq!(deleted, 1);

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_keyword_attach_dedupes_and_cascades() {
    let db = TestDatabase::create_unique().await.expect("create db");
    let conn = db.connection();
    let companies = CompanyRepository::new(conn.clone());
    let keywords = KeywordRepository::new(conn);

    let company = companies
        .create(company::ActiveModel {
            title: Set("Acme".to_string()),
            clerk_user_id: Set(OWNER.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let targets = RelationTargets {
        company_ids: vec![company.id],
        ..Default::default()
    };
    let flags = MatchFlags {
        broad: true,
        ..Default::default()
    };

    let first = keywords
        .attach_batch(
            OWNER,
            &["  shoes  ".to_string(), String::new()],
            &targets,
            flags,
            MatchOverrides::default(),
        )
        .await
        .unwrap();
    // Empty string skipped, "shoes" trimmed and created once
    assert_eq!(first.created, 1);
    assert_eq!(first.existing, 0);
    assert_eq!(first.relations_created, 1);

    let second = keywords
        .attach_batch(
            OWNER,
            &["shoes".to_string()],
            &targets,
            flags,
            MatchOverrides::default(),
        )
        .await
        .unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.existing, 1);
    assert_eq!(second.relations_created, 0);
    assert_eq!(second.relations_updated, 0);

    // Deleting the company cascades the junction rows
    companies.bulk_delete(OWNER, &[company.id], 25).await.unwrap();
    let links = keywords.company_links(OWNER).await.unwrap();
    assert!(links.is_empty());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_update_relations_honors_overrides() {
    let db = TestDatabase::create_unique().await.expect("create db");
    let conn = db.connection();
    let companies = CompanyRepository::new(conn.clone());
    let keywords = KeywordRepository::new(conn);

    let company = companies
        .create(company::ActiveModel {
            title: Set("Acme".to_string()),
            clerk_user_id: Set(OWNER.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let targets = RelationTargets {
        company_ids: vec![company.id],
        ..Default::default()
    };
    keywords
        .attach_batch(
            OWNER,
            &["shoes".to_string()],
            &targets,
            MatchFlags {
                broad: true,
                ..Default::default()
            },
            MatchOverrides::default(),
        )
        .await
        .unwrap();

    let kw = keywords.find_by_text(OWNER, "shoes").await.unwrap().unwrap();

    // broad differs but has no override bit; phrase has one
    let updated = keywords
        .update_relations(
            OWNER,
            &[kw.id],
            MatchFlags {
                broad: false,
                phrase: true,
                ..Default::default()
            },
            MatchOverrides {
                phrase: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated, 1);

    let links = keywords.company_links(OWNER).await.unwrap();
    assert_eq!(links.len(), 1);
    assert!(links[0].broad, "unflagged field must be left untouched");
    assert!(links[0].phrase);

    db.drop_database().await.unwrap();
}

#[test]
fn test_config_from_env() {
    let config = TestDbConfig::default();
    assert!(!config.host.is_empty());
    assert!(config.port > 0);
    assert!(!config.username.is_empty());
    assert!(!config.database.is_empty());
}
