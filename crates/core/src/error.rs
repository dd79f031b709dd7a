use crate::types::{Dimension, Field};
use thiserror::Error;

pub type CampaignResult<T> = Result<T, CampaignError>;

/// A segmentation rule did not match `^[><=][0-9]+(\.[0-9]+)?$`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{} rule format should be like: {}", .dimension.label(), .dimension.example())]
pub struct RuleFormatError {
    pub dimension: Dimension,
    /// The trimmed input that was rejected.
    pub input: String,
    pub expected: &'static str,
}

/// Local form validation failure. Never reaches the network layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{} is required", .0.label())]
    MissingField(Field),

    #[error(transparent)]
    InvalidRule(#[from] RuleFormatError),
}

impl ValidationError {
    /// Dimension of the failing rule, if this is a rule failure.
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            ValidationError::InvalidRule(err) => Some(err.dimension),
            ValidationError::MissingField(_) => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum CampaignError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("{0}")]
    Auth(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl CampaignError {
    /// Whether repeating the same call may succeed without changing input.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CampaignError::Network(_) | CampaignError::Http { .. } | CampaignError::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_error_names_dimension_and_example() {
        let err = RuleFormatError {
            dimension: Dimension::Visits,
            input: "five".to_string(),
            expected: "operator followed by a number",
        };
        assert_eq!(err.to_string(), "Visits rule format should be like: >5, <10, =3");
    }

    #[test]
    fn test_missing_field_messages() {
        assert_eq!(
            ValidationError::MissingField(Field::Title).to_string(),
            "Campaign title is required"
        );
        assert_eq!(
            ValidationError::MissingField(Field::Password).to_string(),
            "Password is required"
        );
    }

    #[test]
    fn test_retryable_classification() {
        assert!(CampaignError::Http { status: 503 }.is_retryable());
        assert!(CampaignError::Network("refused".into()).is_retryable());
        assert!(!CampaignError::Auth("Invalid login".into()).is_retryable());
        assert!(!CampaignError::Validation(ValidationError::MissingField(Field::Message))
            .is_retryable());
    }
}
