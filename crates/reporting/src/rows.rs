//! Per-campaign list row: the derived values the campaign table displays.

use crate::dashboard::{success_rate, PerformanceTier};
use campaign_core::types::Campaign;
use serde::Serialize;

/// Narrowest progress bar drawn, so a 0% campaign is still visible.
const MIN_BAR_WIDTH: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignRow {
    pub id: String,
    pub initial: char,
    pub title: String,
    pub message: String,
    pub status: String,
    pub audience: String,
    pub sent: String,
    pub failed: String,
    pub success_rate: f64,
    pub success_label: String,
    pub tier: PerformanceTier,
    pub bar_width: f64,
    pub created: String,
}

impl CampaignRow {
    pub fn from_campaign(campaign: &Campaign) -> Self {
        let rate = success_rate(campaign.sent_count, campaign.failed_count);
        Self {
            id: campaign.id.clone(),
            initial: campaign.title.chars().next().unwrap_or('C'),
            title: campaign.title.clone(),
            message: campaign.message.clone(),
            status: campaign.status.label(),
            audience: format_count(campaign.audience_size),
            sent: format_count(campaign.sent_count),
            failed: format_count(campaign.failed_count),
            success_rate: rate,
            success_label: format!("{:.1}%", rate),
            tier: PerformanceTier::from_rate(rate),
            bar_width: rate.max(MIN_BAR_WIDTH),
            created: campaign
                .created_at
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }

    pub fn from_campaigns(campaigns: &[Campaign]) -> Vec<Self> {
        campaigns.iter().map(Self::from_campaign).collect()
    }
}

/// Render a counter with thousands separators, e.g. `12,500`.
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
