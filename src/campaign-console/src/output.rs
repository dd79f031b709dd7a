//! Console rendering. Tables for people, JSON for scripts. Everything goes to
//! stdout; logs stay on stderr.

use campaign_core::types::{Campaign, CampaignStats, CreateCampaignReceipt};
use campaign_reporting::{format_count, success_rate, CampaignRow, PerformanceTier, PortfolioSummary};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Table,
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardView<'a> {
    summary: &'a PortfolioSummary,
    success_rate: f64,
    tier: PerformanceTier,
    campaigns: &'a [CampaignRow],
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn token(format: Format, token: &str) -> anyhow::Result<()> {
    match format {
        Format::Table => println!("{}", token),
        Format::Json => print_json(&serde_json::json!({ "token": token }))?,
    }
    Ok(())
}

pub fn environment(format: Format, label: &str) {
    if format == Format::Table {
        println!("Environment: {}\n", label);
    }
}

pub fn dashboard(
    format: Format,
    summary: &PortfolioSummary,
    rows: &[CampaignRow],
) -> anyhow::Result<()> {
    match format {
        Format::Table => print!("{}", render_dashboard(summary, rows)),
        Format::Json => print_json(&DashboardView {
            summary,
            success_rate: summary.success_rate(),
            tier: summary.tier(),
            campaigns: rows,
        })?,
    }
    Ok(())
}

pub fn receipt(format: Format, receipt: &CreateCampaignReceipt) -> anyhow::Result<()> {
    match format {
        Format::Table => {
            let id = receipt.campaign_id.as_deref().unwrap_or("-");
            match receipt.audience_size {
                Some(size) => println!(
                    "Campaign {} created for {} customers\n",
                    id,
                    format_count(size)
                ),
                None => println!("Campaign {} created\n", id),
            }
        }
        Format::Json => print_json(receipt)?,
    }
    Ok(())
}

pub fn campaign(format: Format, campaign: &Campaign) -> anyhow::Result<()> {
    match format {
        Format::Table => print!("{}", render_campaign(campaign)),
        Format::Json => print_json(campaign)?,
    }
    Ok(())
}

pub fn stats(format: Format, stats: &CampaignStats) -> anyhow::Result<()> {
    match format {
        Format::Table => {
            let rate = success_rate(stats.sent_count, stats.failed_count);
            println!("Campaign: {}", stats.campaign_id.as_deref().unwrap_or("-"));
            println!("Audience: {}", format_count(stats.audience_size));
            println!("Sent:     {}", format_count(stats.sent_count));
            println!("Failed:   {}", format_count(stats.failed_count));
            println!("Success:  {:.1}% ({})", rate, PerformanceTier::from_rate(rate).as_str());
        }
        Format::Json => print_json(stats)?,
    }
    Ok(())
}

fn render_dashboard(summary: &PortfolioSummary, rows: &[CampaignRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Campaigns: {} total, {} active, {} completed",
        summary.total_campaigns, summary.active_campaigns, summary.completed_campaigns
    );
    let _ = writeln!(
        out,
        "Delivery:  {} sent, {} failed, {} audience",
        format_count(summary.total_sent),
        format_count(summary.total_failed),
        format_count(summary.total_audience)
    );
    let _ = writeln!(
        out,
        "Success:   {:.1}% ({})\n",
        summary.success_rate(),
        summary.tier().as_str()
    );

    if rows.is_empty() {
        let _ = writeln!(out, "No campaigns yet");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<26} {:<24} {:<10} {:>10} {:>10} {:>10} {:>8}  {:<10}",
        "ID", "TITLE", "STATUS", "AUDIENCE", "SENT", "FAILED", "SUCCESS", "CREATED"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "{:<26} {:<24} {:<10} {:>10} {:>10} {:>10} {:>8}  {:<10}",
            row.id,
            truncate(&row.title, 24),
            row.status,
            row.audience,
            row.sent,
            row.failed,
            row.success_label,
            row.created
        );
    }
    out
}

fn render_campaign(campaign: &Campaign) -> String {
    let row = CampaignRow::from_campaign(campaign);
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {}", row.initial, row.title);
    let _ = writeln!(out, "ID:       {}", row.id);
    let _ = writeln!(out, "Status:   {}", row.status);
    let _ = writeln!(out, "Message:  {}", row.message);
    for (i, variant) in campaign.message_variants.iter().enumerate() {
        let _ = writeln!(out, "Variant {}: {}", i + 1, variant);
    }
    if !campaign.segment_rules.is_null() {
        let _ = writeln!(out, "Rules:    {}", campaign.segment_rules);
    }
    let _ = writeln!(
        out,
        "Delivery: {} audience, {} sent, {} failed",
        row.audience, row.sent, row.failed
    );
    let _ = writeln!(out, "Success:  {} ({})", row.success_label, row.tier.as_str());
    let _ = writeln!(out, "Created:  {}", row.created);
    out
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
