//! Entity definitions for all kplanner tables.

pub mod ad_campaign;
pub mod ad_campaign_filter;
pub mod ad_campaign_keyword;
pub mod ad_group;
pub mod ad_group_filter;
pub mod ad_group_keyword;
pub mod company;
pub mod company_filter;
pub mod company_keyword;
pub mod filter;
pub mod keyword;

pub use ad_campaign::Entity as AdCampaign;
pub use ad_campaign_filter::Entity as AdCampaignFilter;
pub use ad_campaign_keyword::Entity as AdCampaignKeyword;
pub use ad_group::Entity as AdGroup;
pub use ad_group_filter::Entity as AdGroupFilter;
pub use ad_group_keyword::Entity as AdGroupKeyword;
pub use company::Entity as Company;
pub use company_filter::Entity as CompanyFilter;
pub use company_keyword::Entity as CompanyKeyword;
pub use filter::Entity as Filter;
pub use keyword::Entity as Keyword;
