//! Campaign reporting: delivery success rates, performance tiers, portfolio
//! totals and the per-row summaries shown in the campaign list.

pub mod dashboard;
pub mod rows;

pub use dashboard::{success_rate, summarize, PerformanceTier, PortfolioSummary};
pub use rows::{format_count, CampaignRow};
