//! Repository layer for database operations.

pub mod ad_campaign;
pub mod ad_group;
pub mod company;
pub mod filter;
pub mod keyword;

pub use ad_campaign::AdCampaignRepository;
pub use ad_group::AdGroupRepository;
pub use company::CompanyRepository;
pub use filter::FilterRepository;
pub use keyword::KeywordRepository;

use serde::Deserialize;

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    /// Newest first, the default everywhere.
    #[default]
    Desc,
}

/// A one-indexed page window.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u64,
    /// Items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Zero-indexed page for the paginator.
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.page.saturating_sub(1)
    }
}
