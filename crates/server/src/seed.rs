//! Demo data seeder.
//!
//! Fills the demo user's workspace with a deterministic dataset for manual
//! testing, or wipes it again:
//!
//! ```text
//! kplanner-seed import [small|medium|large|huge]
//! kplanner-seed cleanup
//! ```

use std::sync::Arc;

use kplanner_common::config::LimitsConfig;
use kplanner_common::{AppResult, Config};
use kplanner_core::{AdCampaignService, AdGroupService, CompanyService, KeywordService};
use kplanner_db::repositories::keyword::{
    KeywordListFilter, MatchFlags, MatchOverrides, RelationTargets,
};
use kplanner_db::repositories::{
    AdCampaignRepository, AdGroupRepository, CompanyRepository, FilterRepository,
    KeywordRepository, PageRequest,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Entity counts for one dataset size.
#[derive(Debug, Clone, Copy)]
struct SeedSize {
    companies: usize,
    campaigns_per_company: usize,
    ad_groups_per_campaign: usize,
    keywords: usize,
    relations_per_keyword: usize,
}

fn size_for(name: &str) -> Option<SeedSize> {
    let size = match name {
        "small" => SeedSize {
            companies: 5,
            campaigns_per_company: 3,
            ad_groups_per_campaign: 3,
            keywords: 100,
            relations_per_keyword: 3,
        },
        "medium" => SeedSize {
            companies: 10,
            campaigns_per_company: 5,
            ad_groups_per_campaign: 5,
            keywords: 1000,
            relations_per_keyword: 5,
        },
        "large" => SeedSize {
            companies: 20,
            campaigns_per_company: 10,
            ad_groups_per_campaign: 10,
            keywords: 5000,
            relations_per_keyword: 8,
        },
        "huge" => SeedSize {
            companies: 50,
            campaigns_per_company: 20,
            ad_groups_per_campaign: 15,
            keywords: 20000,
            relations_per_keyword: 10,
        },
        _ => return None,
    };
    Some(size)
}

const MODIFIERS: &[&str] = &[
    "best", "cheap", "professional", "premium", "affordable", "quality", "top", "discount",
    "sale", "online",
];
const PRODUCTS: &[&str] = &[
    "shoes",
    "laptop",
    "phone",
    "watch",
    "camera",
    "headphones",
    "tablet",
    "furniture",
    "clothing",
    "books",
    "software",
    "service",
];
const SUFFIXES: &[&str] = &["store", "shop", "price", "deals", "buy"];

/// Deterministic keyword texts, unique by construction.
fn keyword_corpus(count: usize) -> Vec<String> {
    let cap = MODIFIERS.len() * PRODUCTS.len() * SUFFIXES.len();
    (0..count)
        .map(|i| {
            let m = MODIFIERS[i % MODIFIERS.len()];
            let p = PRODUCTS[(i / MODIFIERS.len()) % PRODUCTS.len()];
            let s = SUFFIXES[(i / (MODIFIERS.len() * PRODUCTS.len())) % SUFFIXES.len()];
            if i < cap {
                format!("{m} {p} {s}")
            } else {
                format!("{m} {p} {s} {}", i / cap + 1)
            }
        })
        .collect()
}

/// A rotating slice of entity ids, so relations spread over all entities
/// instead of piling onto the first few.
fn rotated(ids: &[i32], step: usize, take: usize) -> Vec<i32> {
    if ids.is_empty() {
        return Vec::new();
    }
    let start = (step * take) % ids.len();
    ids.iter()
        .cycle()
        .skip(start)
        .take(take.min(ids.len()))
        .copied()
        .collect()
}

struct Seeder {
    company_service: CompanyService,
    ad_campaign_service: AdCampaignService,
    ad_group_service: AdGroupService,
    keyword_service: KeywordService,
    company_repo: CompanyRepository,
    ad_campaign_repo: AdCampaignRepository,
    ad_group_repo: AdGroupRepository,
    keyword_repo: KeywordRepository,
    filter_repo: FilterRepository,
    limits: LimitsConfig,
}

impl Seeder {
    async fn import(&self, owner: &str, size: SeedSize) -> AppResult<()> {
        let active_companies = self.limits.company_active_limit as usize;
        let mut company_ids = Vec::with_capacity(size.companies);
        for i in 0..size.companies {
            let title = format!("Demo Company {:02}", i + 1);
            let (model, _) = self
                .company_service
                .create(owner, &title, i < active_companies)
                .await?;
            company_ids.push(model.id);
        }
        info!(count = company_ids.len(), "Seeded companies");

        let active_campaigns = self.limits.ad_campaign_active_limit as usize;
        let mut campaign_ids = Vec::new();
        for &company_id in &company_ids {
            for j in 0..size.campaigns_per_company {
                let title = format!("Demo Campaign {company_id}-{}", j + 1);
                let (model, _) = self
                    .ad_campaign_service
                    .create(
                        owner,
                        &title,
                        Some(company_id),
                        campaign_ids.len() < active_campaigns,
                    )
                    .await?;
                campaign_ids.push(model.id);
            }
        }
        info!(count = campaign_ids.len(), "Seeded ad campaigns");

        let active_groups = self.limits.ad_group_active_limit as usize;
        let mut group_ids = Vec::new();
        for &campaign_id in &campaign_ids {
            for j in 0..size.ad_groups_per_campaign {
                let title = format!("Demo Ad Group {campaign_id}-{}", j + 1);
                let (model, _) = self
                    .ad_group_service
                    .create(
                        owner,
                        &title,
                        Some(campaign_id),
                        group_ids.len() < active_groups,
                    )
                    .await?;
                group_ids.push(model.id);
            }
        }
        info!(count = group_ids.len(), "Seeded ad groups");

        let texts = keyword_corpus(size.keywords);
        let overrides = MatchOverrides {
            broad: true,
            phrase: true,
            exact: true,
            ..Default::default()
        };
        let mut created = 0;
        let mut existing = 0;
        for (step, batch) in texts.chunks(100).enumerate() {
            let targets = RelationTargets {
                company_ids: rotated(&company_ids, step, size.relations_per_keyword),
                ad_campaign_ids: rotated(&campaign_ids, step, size.relations_per_keyword),
                ad_group_ids: rotated(&group_ids, step, size.relations_per_keyword),
            };
            let flags = MatchFlags {
                broad: step % 2 == 0,
                phrase: step % 3 == 0,
                exact: step % 5 == 0,
                ..Default::default()
            };
            let (outcome, _) = self
                .keyword_service
                .bulk_create(owner, batch, &targets, flags, overrides, None)
                .await?;
            created += outcome.created;
            existing += outcome.existing;
        }
        info!(created, existing, "Seeded keywords");

        Ok(())
    }

    /// Deletes everything the owner has, children before parents.
    async fn cleanup(&self, owner: &str) -> AppResult<()> {
        let batch = self.limits.batch_size as usize;
        let page = PageRequest {
            page: 1,
            page_size: 100_000,
        };

        let keywords = self
            .keyword_repo
            .find_filtered(owner, &KeywordListFilter::default())
            .await?;
        let ids: Vec<i32> = keywords.iter().map(|k| k.id).collect();
        let deleted = self.keyword_repo.bulk_delete(owner, &ids, batch).await?;
        info!(deleted, "Removed keywords");

        let (filters, _) = self
            .filter_repo
            .list(owner, &Default::default(), page)
            .await?;
        let ids: Vec<i32> = filters.iter().map(|f| f.id).collect();
        let deleted = self.filter_repo.bulk_delete(owner, &ids, batch).await?;
        info!(deleted, "Removed filter words");

        let (groups, _) = self
            .ad_group_repo
            .list(owner, &Default::default(), page)
            .await?;
        let ids: Vec<i32> = groups.iter().map(|g| g.id).collect();
        let deleted = self.ad_group_repo.bulk_delete(owner, &ids, batch).await?;
        info!(deleted, "Removed ad groups");

        let (campaigns, _) = self
            .ad_campaign_repo
            .list(owner, &Default::default(), page)
            .await?;
        let ids: Vec<i32> = campaigns.iter().map(|c| c.id).collect();
        let deleted = self.ad_campaign_repo.bulk_delete(owner, &ids, batch).await?;
        info!(deleted, "Removed ad campaigns");

        let (companies, _) = self
            .company_repo
            .list(owner, &Default::default(), page)
            .await?;
        let ids: Vec<i32> = companies.iter().map(|c| c.id).collect();
        let deleted = self.company_repo.bulk_delete(owner, &ids, batch).await?;
        info!(deleted, "Removed companies");

        Ok(())
    }
}

const USAGE: &str = "usage: kplanner-seed <import [small|medium|large|huge] | cleanup>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kplanner=info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let command = args.next().unwrap_or_default();

    let config = Config::load()?;
    let db = kplanner_db::init(&config).await?;
    kplanner_db::migrate(&db).await?;

    let db = Arc::new(db);
    let company_repo = CompanyRepository::new(Arc::clone(&db));
    let ad_campaign_repo = AdCampaignRepository::new(Arc::clone(&db));
    let ad_group_repo = AdGroupRepository::new(Arc::clone(&db));
    let keyword_repo = KeywordRepository::new(Arc::clone(&db));
    let filter_repo = FilterRepository::new(Arc::clone(&db));

    let limits = config.limits.clone();
    let seeder = Seeder {
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
            keyword_repo.clone(),
            company_repo.clone(),
            ad_campaign_repo.clone(),
            ad_group_repo.clone(),
            limits.clone(),
        ),
        company_repo,
        ad_campaign_repo,
        ad_group_repo,
        keyword_repo,
        filter_repo,
        limits,
    };

    let owner = config.auth.demo_user_id;
    match command.as_str() {
        "import" => {
            let size_name = args.next().unwrap_or_else(|| "medium".to_string());
            let Some(size) = size_for(&size_name) else {
                return Err(format!("unknown size '{size_name}'\n{USAGE}").into());
            };
            info!(owner = %owner, size = %size_name, "Importing demo data");
            seeder.import(&owner, size).await?;
        }
        "cleanup" => {
            info!(owner = %owner, "Removing all demo data");
            seeder.cleanup(&owner).await?;
        }
        _ => return Err(USAGE.into()),
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_corpus_is_unique() {
        let texts = keyword_corpus(2000);
        assert_eq!(texts.len(), 2000);
        let unique: std::collections::HashSet<&str> =
            texts.iter().map(String::as_str).collect();
        assert_eq!(unique.len(), 2000);
    }

    #[test]
    fn test_rotated_wraps_and_caps() {
        let ids = vec![1, 2, 3];
        assert_eq!(rotated(&ids, 0, 2), vec![1, 2]);
        assert_eq!(rotated(&ids, 1, 2), vec![3, 1]);
        assert_eq!(rotated(&ids, 0, 5), vec![1, 2, 3]);
        assert!(rotated(&[], 0, 2).is_empty());
    }

    #[test]
    fn test_size_names() {
        assert!(size_for("small").is_some());
        assert!(size_for("huge").is_some());
        assert!(size_for("gigantic").is_none());
    }
}
