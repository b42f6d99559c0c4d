//! Business logic services.

pub mod ad_campaign;
pub mod ad_group;
pub mod auth;
pub mod company;
pub mod filter;
pub mod keyword;

pub use ad_campaign::AdCampaignService;
pub use ad_group::AdGroupService;
pub use auth::AuthService;
pub use company::CompanyService;
pub use filter::FilterService;
pub use keyword::KeywordService;

/// Result of a bulk delete pass.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct BulkDeleteOutcome {
    /// Rows actually removed.
    pub deleted: u64,
    /// IDs the caller asked for.
    pub requested: u64,
    /// Number of delete batches issued.
    pub batches_processed: u64,
    /// Batch size used.
    pub batch_size: u64,
}

impl BulkDeleteOutcome {
    pub(crate) fn new(deleted: u64, requested: usize, batch_size: usize) -> Self {
        let requested = requested as u64;
        let batch_size = batch_size.max(1) as u64;
        Self {
            deleted,
            requested,
            batches_processed: requested.div_ceil(batch_size),
            batch_size,
        }
    }
}
