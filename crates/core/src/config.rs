use serde::Deserialize;

/// Root console configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_CONSOLE__`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub response_ordering: ResponseOrdering,
    #[serde(default = "default_eager_load")]
    pub eager_load: bool,
}

/// Which of several in-flight list responses ends up visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseOrdering {
    /// Whichever response arrives last replaces the list.
    #[default]
    LastResolved,
    /// Responses to superseded requests are dropped.
    LastIssued,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub token: Option<String>,
}

fn default_base_url() -> String {
    "http://localhost:5001/api".to_string()
}
fn default_eager_load() -> bool {
    true
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_ordering: ResponseOrdering::default(),
            eager_load: default_eager_load(),
        }
    }
}

impl ApiConfig {
    pub fn environment_label(&self) -> &'static str {
        if self.base_url.contains("localhost") {
            "Development"
        } else {
            "Production"
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder().add_source(
            config::Environment::with_prefix("CAMPAIGN_CONSOLE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:5001/api");
        assert!(config.api.request_timeout_ms.is_none());
        assert_eq!(config.session.response_ordering, ResponseOrdering::LastResolved);
        assert!(config.session.eager_load);
        assert!(config.auth.token.is_none());
    }

    #[test]
    fn test_environment_label() {
        let mut api = ApiConfig::default();
        assert_eq!(api.environment_label(), "Development");
        api.base_url = "https://crm.example.com/api".to_string();
        assert_eq!(api.environment_label(), "Production");
    }

    #[test]
    fn test_response_ordering_names() {
        let ordering: ResponseOrdering = serde_json::from_str(r#""last_issued""#).unwrap();
        assert_eq!(ordering, ResponseOrdering::LastIssued);
    }
}
