//! Segmentation rule grammar and campaign draft assembly.
//!
//! Everything here is pure: drafts are checked and turned into create
//! requests without touching the network.

pub mod draft;
pub mod rules;

pub use draft::{build_submission, CampaignDraft};
pub use rules::{parse_rule, validate};
