//! Campaign Console: operator CLI for the campaign management service.
//!
//! Loads configuration, wires the campaign service client into a session
//! controller and runs a single command against it.

mod output;

use anyhow::Context;
use campaign_core::config::{AppConfig, ResponseOrdering};
use campaign_core::types::{CampaignStatus, DeliveryUpdate, Dimension};
use campaign_management::{CampaignApi, CampaignClient, Credentials, LoginForm, SessionController};
use campaign_segmentation::CampaignDraft;
use clap::{Parser, Subcommand, ValueEnum};
use output::Format;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "campaign-console")]
#[command(about = "Operator console for the campaign management service")]
#[command(version)]
struct Cli {
    /// Campaign service base URL (overrides config)
    #[arg(long, env = "CAMPAIGN_CONSOLE__API__BASE_URL", global = true)]
    base_url: Option<String>,

    /// Bearer token (overrides config)
    #[arg(long, env = "CAMPAIGN_CONSOLE__AUTH__TOKEN", global = true, hide_env_values = true)]
    token: Option<String>,

    /// Per-request timeout in milliseconds (overrides config)
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Which overlapping list response wins (overrides config)
    #[arg(long, value_enum, global = true)]
    ordering: Option<OrderingArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table, global = true)]
    format: Format,

    /// Emit logs as JSON
    #[arg(long, default_value_t = false, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the bearer token
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Show the portfolio summary and every campaign
    List,
    /// Create a campaign, then show the refreshed list
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        /// Spend rule, e.g. ">10000"
        #[arg(long, default_value = "")]
        spend: String,
        /// Visits rule, e.g. "<5"
        #[arg(long, default_value = "")]
        visits: String,
        /// Alternative message text; repeatable
        #[arg(long = "variant")]
        variants: Vec<String>,
    },
    /// Show a single campaign
    Show { id: String },
    /// Show delivery statistics for a campaign
    Stats { id: String },
    /// Record delivery progress for a campaign
    Delivery {
        id: String,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long)]
        sent: Option<u64>,
        #[arg(long)]
        failed: Option<u64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderingArg {
    LastResolved,
    LastIssued,
}

impl From<OrderingArg> for ResponseOrdering {
    fn from(arg: OrderingArg) -> Self {
        match arg {
            OrderingArg::LastResolved => ResponseOrdering::LastResolved,
            OrderingArg::LastIssued => ResponseOrdering::LastIssued,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StatusArg {
    Pending,
    Running,
    Completed,
}

impl From<StatusArg> for CampaignStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => CampaignStatus::Pending,
            StatusArg::Running => CampaignStatus::Running,
            StatusArg::Completed => CampaignStatus::Completed,
        }
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "campaign_console=info,campaign_management=info".into());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    // Apply CLI overrides
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    if let Some(token) = cli.token {
        config.auth.token = Some(token);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.api.request_timeout_ms = Some(timeout_ms);
    }
    if let Some(ordering) = cli.ordering {
        config.session.response_ordering = ordering.into();
    }

    info!(
        base_url = %config.api.base_url,
        environment = config.api.environment_label(),
        ordering = ?config.session.response_ordering,
        "Configuration loaded"
    );

    let credentials = config.auth.token.clone().map(Credentials::bearer);
    let client = CampaignClient::new(&config.api, credentials)
        .context("failed to build campaign service client")?;
    let format = cli.format;

    match cli.command {
        Command::Login { username, password } => {
            let credentials = client.login(&LoginForm::new(username, password)).await?;
            output::token(format, credentials.token())?;
        }
        Command::List => {
            let controller = SessionController::new(client, &config.session);
            controller.load().await?;
            output::environment(format, config.api.environment_label());
            output::dashboard(format, &controller.summary(), &controller.rows())?;
        }
        Command::Create {
            title,
            message,
            spend,
            visits,
            variants,
        } => {
            let mut draft = CampaignDraft::new()
                .title(title)
                .message(message)
                .rule(Dimension::Spend, spend)
                .rule(Dimension::Visits, visits);
            for variant in variants {
                draft.add_variant(variant);
            }

            let controller = SessionController::new(client, &config.session);
            let outcome = controller.create(&mut draft).await?;
            output::receipt(format, &outcome.receipt)?;
            output::dashboard(format, &controller.summary(), &controller.rows())?;
        }
        Command::Show { id } => {
            let campaign = client.get_campaign(&id).await?;
            output::campaign(format, &campaign)?;
        }
        Command::Stats { id } => {
            let stats = client.campaign_stats(&id).await?;
            output::stats(format, &stats)?;
        }
        Command::Delivery {
            id,
            status,
            sent,
            failed,
        } => {
            let update = DeliveryUpdate {
                campaign_id: id,
                status: status.map(Into::into),
                sent_count: sent,
                failed_count: failed,
            };
            let campaign = client.update_delivery(&update).await?;
            output::campaign(format, &campaign)?;
        }
    }

    Ok(())
}
