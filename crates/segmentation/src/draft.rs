//! Campaign draft: the in-progress create form and its conversion into a
//! create request.

use crate::rules::validate;
use campaign_core::error::ValidationError;
use campaign_core::types::{CampaignCreateRequest, Dimension, Field, SegmentRuleSet};
use std::collections::BTreeMap;

/// Unvalidated campaign input as typed by the operator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignDraft {
    pub title: String,
    pub message: String,
    /// Raw rule text per dimension; a missing entry is the same as blank.
    pub segment_rules: BTreeMap<Dimension, String>,
    pub message_variants: Vec<String>,
}

impl CampaignDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn rule(mut self, dimension: Dimension, text: impl Into<String>) -> Self {
        self.segment_rules.insert(dimension, text.into());
        self
    }

    pub fn variant(mut self, text: impl Into<String>) -> Self {
        self.message_variants.push(text.into());
        self
    }

    // ─── Per-keystroke edits ─────────────────────────────────────────────

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    pub fn set_rule(&mut self, dimension: Dimension, text: impl Into<String>) {
        self.segment_rules.insert(dimension, text.into());
    }

    pub fn rule_text(&self, dimension: Dimension) -> &str {
        self.segment_rules
            .get(&dimension)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn add_variant(&mut self, text: impl Into<String>) {
        self.message_variants.push(text.into());
    }

    /// Returns `false` if there is no variant at `index`.
    pub fn set_variant(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.message_variants.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }

    pub fn remove_variant(&mut self, index: usize) -> Option<String> {
        (index < self.message_variants.len()).then(|| self.message_variants.remove(index))
    }

    /// Back to the empty form shown after a successful submission.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Validate a draft and assemble the create request.
///
/// Checks run in a fixed order (title, message, then each dimension in
/// [`Dimension::ALL`] order) and stop at the first failure.
pub fn build_submission(draft: &CampaignDraft) -> Result<CampaignCreateRequest, ValidationError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingField(Field::Title));
    }

    let message = draft.message.trim();
    if message.is_empty() {
        return Err(ValidationError::MissingField(Field::Message));
    }

    let mut segment_rules = SegmentRuleSet::new();
    for dimension in Dimension::ALL {
        if let Some(rule) = validate(dimension, draft.rule_text(dimension))? {
            segment_rules.insert(dimension, rule);
        }
    }

    let message_variants = draft
        .message_variants
        .iter()
        .filter(|variant| !variant.trim().is_empty())
        .cloned()
        .collect();

    Ok(CampaignCreateRequest {
        title: title.to_string(),
        message: message.to_string(),
        segment_rules,
        message_variants,
    })
}
