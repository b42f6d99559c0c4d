//! Database migrations.
#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20250101_000001_create_company_table;
mod m20250101_000002_create_ad_campaign_table;
mod m20250101_000003_create_ad_group_table;
mod m20250101_000004_create_keyword_table;
mod m20250101_000005_create_filter_table;
mod m20250101_000006_create_keyword_junction_tables;
mod m20250101_000007_create_filter_junction_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250101_000001_create_company_table::Migration),
            Box::new(m20250101_000002_create_ad_campaign_table::Migration),
            Box::new(m20250101_000003_create_ad_group_table::Migration),
            Box::new(m20250101_000004_create_keyword_table::Migration),
            Box::new(m20250101_000005_create_filter_table::Migration),
            Box::new(m20250101_000006_create_keyword_junction_tables::Migration),
            Box::new(m20250101_000007_create_filter_junction_tables::Migration),
        ]
    }
}
