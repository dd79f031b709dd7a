//! Admin login and the bearer credentials it yields.
//!
//! Credentials are plain values: whoever logs in decides where to keep them
//! and hands them to [`CampaignClient::new`] or
//! [`CampaignClient::with_credentials`].

use crate::client::CampaignClient;
use crate::decode;
use campaign_core::error::{CampaignError, CampaignResult, ValidationError};
use campaign_core::types::{ErrorResponse, Field, LoginRequest};
use reqwest::Method;
use std::fmt;
use tracing::{info, warn};

const LOGIN_REJECTED: &str = "Invalid login";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    token: String,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields must be non-blank. Values are sent as typed.
    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        if self.username.trim().is_empty() {
            return Err(ValidationError::MissingField(Field::Username));
        }
        if self.password.trim().is_empty() {
            return Err(ValidationError::MissingField(Field::Password));
        }
        Ok(LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CampaignClient {
    /// `POST /admin/login`. A rejected login surfaces the service's `message`.
    pub async fn login(&self, form: &LoginForm) -> CampaignResult<Credentials> {
        let request = form.validate()?;
        let (status, bytes) = self
            .execute("login", Method::POST, "/admin/login", Some(&request))
            .await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&bytes)
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.trim().is_empty())
                .unwrap_or_else(|| LOGIN_REJECTED.to_string());
            warn!(username = %request.username, status = status.as_u16(), "login rejected");
            return Err(CampaignError::Auth(message));
        }

        let token = decode::login_token(decode::parse_body(&bytes)?)?;
        info!(username = %request.username, "login succeeded");
        Ok(Credentials::bearer(token))
    }
}
