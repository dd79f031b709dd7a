//! Campaign management console: remote campaign service client and the
//! session controller that sequences load / create / refresh.

pub mod auth;
pub mod client;
pub mod decode;
pub mod session;

pub use auth::{Credentials, LoginForm};
pub use client::{CampaignApi, CampaignClient};
pub use session::{ActiveView, CreateOutcome, ListState, SessionController, SubmitState, ViewState};
