//! Campaign performance dashboard: success rate, tiering and portfolio totals.
//!
//! Totals are recomputed from the full campaign list on every call; the list
//! is small and replaced wholesale on each fetch.

use campaign_core::types::{Campaign, CampaignStatus};
use serde::Serialize;

/// Percentage of processed recipients (sent + failed) that were sent to.
///
/// Zero processed recipients reads as 0%.
pub fn success_rate(sent: u64, failed: u64) -> f64 {
    let processed = sent as f64 + failed as f64;
    if processed == 0.0 {
        return 0.0;
    }
    100.0 * sent as f64 / processed
}

/// Visual performance band for a success rate. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceTier {
    High,
    Medium,
    Low,
}

impl PerformanceTier {
    pub const HIGH_THRESHOLD: f64 = 80.0;
    pub const MEDIUM_THRESHOLD: f64 = 60.0;

    pub fn from_rate(rate: f64) -> Self {
        if rate >= Self::HIGH_THRESHOLD {
            PerformanceTier::High
        } else if rate >= Self::MEDIUM_THRESHOLD {
            PerformanceTier::Medium
        } else {
            PerformanceTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceTier::High => "high",
            PerformanceTier::Medium => "medium",
            PerformanceTier::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_campaigns: u64,
    pub active_campaigns: u64,
    pub completed_campaigns: u64,
    pub total_sent: u64,
    pub total_failed: u64,
    pub total_audience: u64,
}

impl PortfolioSummary {
    pub fn success_rate(&self) -> f64 {
        success_rate(self.total_sent, self.total_failed)
    }

    pub fn tier(&self) -> PerformanceTier {
        PerformanceTier::from_rate(self.success_rate())
    }
}

/// Aggregate the campaign list into dashboard totals.
pub fn summarize(campaigns: &[Campaign]) -> PortfolioSummary {
    campaigns
        .iter()
        .fold(PortfolioSummary::default(), |mut summary, campaign| {
            summary.total_campaigns += 1;
            match campaign.status {
                CampaignStatus::Running => summary.active_campaigns += 1,
                CampaignStatus::Completed => summary.completed_campaigns += 1,
                CampaignStatus::Pending | CampaignStatus::Unknown(_) => {}
            }
            summary.total_sent = summary.total_sent.saturating_add(campaign.sent_count);
            summary.total_failed = summary.total_failed.saturating_add(campaign.failed_count);
            summary.total_audience = summary
                .total_audience
                .saturating_add(campaign.audience_size);
            summary
        })
}
