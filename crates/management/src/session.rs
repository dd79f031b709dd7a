//! Campaign session controller.
//!
//! Owns the campaign list and sequences load / create / refresh against the
//! campaign service. View state is one tagged snapshot with two independent
//! regions: the list and the pending submission. A failed submission never
//! touches the list, and a failed load never shows stale campaigns.

use crate::client::CampaignApi;
use campaign_core::config::{ResponseOrdering, SessionConfig};
use campaign_core::error::{CampaignError, CampaignResult, ValidationError};
use campaign_core::types::{Campaign, CreateCampaignReceipt};
use campaign_reporting::{summarize, CampaignRow, PortfolioSummary};
use campaign_segmentation::{build_submission, CampaignDraft};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

pub const LOAD_FAILED_MESSAGE: &str =
    "Failed to load campaigns. Please check your connection and try again.";
pub const CREATE_FAILED_MESSAGE: &str = "Failed to create campaign. Please try again.";

/// A user-facing failure notice plus the underlying cause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub cause: String,
}

impl Failure {
    fn new(message: &str, cause: &CampaignError) -> Self {
        Self {
            message: message.to_string(),
            cause: cause.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    Idle,
    Loading,
    Loaded(Vec<Campaign>),
    LoadFailed(Failure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitState {
    Idle,
    Submitting,
    /// The draft was rejected locally; nothing was sent.
    Invalid(ValidationError),
    SubmitFailed(Failure),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveView {
    Dashboard,
    Create,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub list: ListState,
    pub submit: SubmitState,
    pub view: ActiveView,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            list: ListState::Idle,
            submit: SubmitState::Idle,
            view: ActiveView::Dashboard,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateOutcome {
    pub receipt: CreateCampaignReceipt,
    /// View the caller should switch to.
    pub next_view: ActiveView,
}

pub struct SessionController<A> {
    api: A,
    ordering: ResponseOrdering,
    state: RwLock<ViewState>,
    /// Ticket of the most recently issued list request.
    issued: AtomicU64,
}

impl<A: CampaignApi> SessionController<A> {
    /// A controller in the `Idle` state. No request is made.
    pub fn new(api: A, config: &SessionConfig) -> Self {
        Self {
            api,
            ordering: config.response_ordering,
            state: RwLock::new(ViewState::default()),
            issued: AtomicU64::new(0),
        }
    }

    /// Build a controller and, unless disabled, fetch the list right away.
    pub async fn start(api: A, config: &SessionConfig) -> Self {
        let controller = Self::new(api, config);
        if config.eager_load {
            // Failures are recorded in the list state.
            let _ = controller.load().await;
        }
        controller
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> ViewState {
        self.state.read().clone()
    }

    pub fn view(&self) -> ActiveView {
        self.state.read().view
    }

    pub fn set_view(&self, view: ActiveView) {
        self.state.write().view = view;
    }

    /// Campaigns currently shown. Empty unless the list is loaded.
    pub fn campaigns(&self) -> Vec<Campaign> {
        match &self.state.read().list {
            ListState::Loaded(campaigns) => campaigns.clone(),
            _ => Vec::new(),
        }
    }

    pub fn summary(&self) -> PortfolioSummary {
        match &self.state.read().list {
            ListState::Loaded(campaigns) => summarize(campaigns),
            _ => PortfolioSummary::default(),
        }
    }

    pub fn rows(&self) -> Vec<CampaignRow> {
        match &self.state.read().list {
            ListState::Loaded(campaigns) => CampaignRow::from_campaigns(campaigns),
            _ => Vec::new(),
        }
    }

    /// Fetch the full campaign list and replace whatever is shown.
    pub async fn load(&self) -> CampaignResult<()> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().list = ListState::Loading;
        debug!(ticket, "loading campaigns");

        let result = self.api.list_campaigns().await;

        if self.is_superseded(ticket) {
            metrics::counter!("console.responses_discarded").increment(1);
            debug!(ticket, "discarding response to superseded list request");
            return result.map(|_| ());
        }

        let mut state = self.state.write();
        match result {
            Ok(campaigns) => {
                info!(ticket, count = campaigns.len(), "campaign list loaded");
                state.list = ListState::Loaded(campaigns);
                Ok(())
            }
            Err(err) => {
                warn!(ticket, error = %err, "failed to load campaigns");
                state.list = ListState::LoadFailed(Failure::new(LOAD_FAILED_MESSAGE, &err));
                Err(err)
            }
        }
    }

    /// Operator-triggered reload. Safe to call while another load is in flight.
    pub async fn refresh(&self) -> CampaignResult<()> {
        self.load().await
    }

    /// Validate and submit a draft.
    ///
    /// On success the draft is reset, the list is reloaded after the create
    /// response arrives, and the dashboard is selected. On failure the draft
    /// is left as typed and the list is untouched.
    pub async fn create(&self, draft: &mut CampaignDraft) -> CampaignResult<CreateOutcome> {
        let request = match build_submission(draft) {
            Ok(request) => request,
            Err(err) => {
                debug!(error = %err, "draft rejected");
                self.state.write().submit = SubmitState::Invalid(err.clone());
                return Err(err.into());
            }
        };

        self.state.write().submit = SubmitState::Submitting;
        info!(title = %request.title, rules = request.segment_rules.len(), "submitting campaign");

        match self.api.create_campaign(&request).await {
            Ok(receipt) => {
                info!(
                    campaign_id = ?receipt.campaign_id,
                    audience_size = ?receipt.audience_size,
                    "campaign created"
                );
                draft.reset();
                self.state.write().submit = SubmitState::Idle;

                // A failed reload is recorded in the list state; the campaign exists regardless.
                let _ = self.load().await;

                self.state.write().view = ActiveView::Dashboard;
                Ok(CreateOutcome {
                    receipt,
                    next_view: ActiveView::Dashboard,
                })
            }
            Err(err) => {
                warn!(error = %err, "failed to create campaign");
                self.state.write().submit =
                    SubmitState::SubmitFailed(Failure::new(CREATE_FAILED_MESSAGE, &err));
                Err(err)
            }
        }
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.ordering == ResponseOrdering::LastIssued
            && self.issued.load(Ordering::SeqCst) != ticket
    }
}
