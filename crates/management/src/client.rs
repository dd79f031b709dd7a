//! HTTP client for the remote campaign service.
//!
//! Every call is a single request: no retries, no queuing. Any non-2xx
//! status is a failure.

use crate::auth::Credentials;
use crate::decode;
use async_trait::async_trait;
use campaign_core::config::ApiConfig;
use campaign_core::error::{CampaignError, CampaignResult};
use campaign_core::types::{
    Campaign, CampaignCreateRequest, CampaignStats, CreateCampaignReceipt, DeliveryUpdate,
};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Operations the session controller needs from the campaign service.
#[async_trait]
pub trait CampaignApi: Send + Sync {
    async fn list_campaigns(&self) -> CampaignResult<Vec<Campaign>>;

    async fn create_campaign(
        &self,
        request: &CampaignCreateRequest,
    ) -> CampaignResult<CreateCampaignReceipt>;

    async fn get_campaign(&self, id: &str) -> CampaignResult<Campaign>;

    async fn campaign_stats(&self, id: &str) -> CampaignResult<CampaignStats>;

    async fn update_delivery(&self, update: &DeliveryUpdate) -> CampaignResult<Campaign>;
}

#[async_trait]
impl<T: CampaignApi + ?Sized> CampaignApi for Arc<T> {
    async fn list_campaigns(&self) -> CampaignResult<Vec<Campaign>> {
        (**self).list_campaigns().await
    }

    async fn create_campaign(
        &self,
        request: &CampaignCreateRequest,
    ) -> CampaignResult<CreateCampaignReceipt> {
        (**self).create_campaign(request).await
    }

    async fn get_campaign(&self, id: &str) -> CampaignResult<Campaign> {
        (**self).get_campaign(id).await
    }

    async fn campaign_stats(&self, id: &str) -> CampaignResult<CampaignStats> {
        (**self).campaign_stats(id).await
    }

    async fn update_delivery(&self, update: &DeliveryUpdate) -> CampaignResult<Campaign> {
        (**self).update_delivery(update).await
    }
}

/// reqwest-backed campaign service client.
#[derive(Clone)]
pub struct CampaignClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    config: ApiConfig,
    credentials: Option<Credentials>,
    http: reqwest::Client,
}

impl CampaignClient {
    /// Build a client. Credentials, when given, are sent as a bearer token on
    /// every request.
    pub fn new(config: &ApiConfig, credentials: Option<Credentials>) -> CampaignResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::USER_AGENT,
            HeaderValue::from_static(concat!("campaign-console/", env!("CARGO_PKG_VERSION"))),
        );
        if let Some(credentials) = &credentials {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", credentials.token()))
                .map_err(|e| CampaignError::Config(format!("invalid bearer token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder
            .build()
            .map_err(|e| CampaignError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                config: config.clone(),
                credentials,
                http,
            }),
        })
    }

    /// Same endpoint, new credentials.
    pub fn with_credentials(&self, credentials: Credentials) -> CampaignResult<Self> {
        Self::new(&self.inner.config, Some(credentials))
    }

    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.inner.credentials.as_ref()
    }

    /// Send one request and hand back the raw status and body.
    pub(crate) async fn execute<B: Serialize + ?Sized + Sync>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> CampaignResult<(StatusCode, Vec<u8>)> {
        let url = format!("{}{}", self.inner.config.base_url.trim_end_matches('/'), path);
        metrics::counter!("console.requests", "operation" => operation).increment(1);
        debug!(operation, %method, %url, "sending request");

        let mut request = self.inner.http.request(method, &url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            metrics::counter!("console.request_failures", "operation" => operation).increment(1);
            warn!(operation, %url, error = %e, "request failed");
            CampaignError::Network(e.to_string())
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            metrics::counter!("console.request_failures", "operation" => operation).increment(1);
            warn!(operation, %url, error = %e, "failed to read response body");
            CampaignError::Network(e.to_string())
        })?;

        debug!(operation, status = status.as_u16(), bytes = bytes.len(), "response received");
        Ok((status, bytes.to_vec()))
    }

    async fn request<B: Serialize + ?Sized + Sync>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> CampaignResult<serde_json::Value> {
        let (status, bytes) = self.execute(operation, method, path, body).await?;
        if !status.is_success() {
            metrics::counter!("console.request_failures", "operation" => operation).increment(1);
            warn!(operation, status = status.as_u16(), "request rejected");
            return Err(CampaignError::Http {
                status: status.as_u16(),
            });
        }
        decode::parse_body(&bytes)
    }
}

/// Join path segments into an absolute path, percent-encoding each segment.
fn segment_path(segments: &[&str]) -> CampaignResult<String> {
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| CampaignError::Config(format!("invalid path base: {}", e)))?;
    url.path_segments_mut()
        .map_err(|_| CampaignError::Config("path base cannot hold segments".to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url.path().to_string())
}

#[async_trait]
impl CampaignApi for CampaignClient {
    async fn list_campaigns(&self) -> CampaignResult<Vec<Campaign>> {
        let value = self
            .request::<()>("list_campaigns", Method::POST, "/getallcampaigns", None)
            .await?;
        decode::campaign_list(value)
    }

    async fn create_campaign(
        &self,
        request: &CampaignCreateRequest,
    ) -> CampaignResult<CreateCampaignReceipt> {
        let value = self
            .request("create_campaign", Method::POST, "/createcampaign", Some(request))
            .await?;
        decode::receipt(value)
    }

    async fn get_campaign(&self, id: &str) -> CampaignResult<Campaign> {
        let body = serde_json::json!({ "id": id });
        let value = self
            .request("get_campaign", Method::POST, "/getcampaignbyid", Some(&body))
            .await?;
        decode::campaign(value)
    }

    async fn campaign_stats(&self, id: &str) -> CampaignResult<CampaignStats> {
        let path = segment_path(&["campaigns", id, "stats"])?;
        let value = self
            .request::<()>("campaign_stats", Method::GET, &path, None)
            .await?;
        decode::stats(value)
    }

    async fn update_delivery(&self, update: &DeliveryUpdate) -> CampaignResult<Campaign> {
        let value = self
            .request("update_delivery", Method::PUT, "/campaigns/delivery", Some(update))
            .await?;
        decode::campaign(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campaign_core::types::{CampaignStatus, Dimension, Rule, RuleOperator, SegmentRuleSet};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, credentials: Option<Credentials>) -> CampaignClient {
        let config = ApiConfig {
            base_url: server.uri(),
            request_timeout_ms: None,
        };
        CampaignClient::new(&config, credentials).unwrap()
    }

    #[tokio::test]
    async fn test_list_campaigns() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getallcampaigns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"_id": "c-1", "title": "Sale", "status": "running", "sentCount": 8, "failedCount": 2},
                {"_id": "c-2", "title": "Welcome"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let campaigns = client_for(&server, None).list_campaigns().await.unwrap();
        assert_eq!(campaigns.len(), 2);
        assert_eq!(campaigns[0].status, CampaignStatus::Running);
        assert_eq!(campaigns[0].sent_count, 8);
        assert_eq!(campaigns[1].sent_count, 0);
    }

    #[tokio::test]
    async fn test_list_non_array_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getallcampaigns"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": null})))
            .mount(&server)
            .await;

        let campaigns = client_for(&server, None).list_campaigns().await.unwrap();
        assert!(campaigns.is_empty());
    }

    #[tokio::test]
    async fn test_non_success_status_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getallcampaigns"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).list_campaigns().await.unwrap_err();
        assert!(matches!(err, CampaignError::Http { status: 503 }));
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getallcampaigns"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server, None).list_campaigns().await.unwrap_err();
        assert!(matches!(err, CampaignError::Decode(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let config = ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_ms: Some(2_000),
        };
        let client = CampaignClient::new(&config, None).unwrap();
        let err = client.list_campaigns().await.unwrap_err();
        assert!(matches!(err, CampaignError::Network(_)));
    }

    #[tokio::test]
    async fn test_create_campaign_sends_wire_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/createcampaign"))
            .and(body_json(json!({
                "title": "Sale",
                "message": "Hi [name]",
                "segmentRules": {"spend": ">10000"},
                "messageVariants": ["A", "B"]
            })))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(json!({"campaignId": "c-7", "audienceSize": 1200})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut rules = SegmentRuleSet::new();
        rules.insert(
            Dimension::Spend,
            Rule::new(RuleOperator::GreaterThan, 10000.0),
        );
        let request = CampaignCreateRequest {
            title: "Sale".to_string(),
            message: "Hi [name]".to_string(),
            segment_rules: rules,
            message_variants: vec!["A".to_string(), "B".to_string()],
        };

        let receipt = client_for(&server, None)
            .create_campaign(&request)
            .await
            .unwrap();
        assert_eq!(receipt.campaign_id.as_deref(), Some("c-7"));
        assert_eq!(receipt.audience_size, Some(1200));
    }

    #[tokio::test]
    async fn test_get_campaign_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getcampaignbyid"))
            .and(body_json(json!({"id": "c-1"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"_id": "c-1", "title": "Sale"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let campaign = client_for(&server, None).get_campaign("c-1").await.unwrap();
        assert_eq!(campaign.title, "Sale");
    }

    #[test]
    fn test_segment_path_encodes_ids() {
        assert_eq!(
            segment_path(&["campaigns", "c-1", "stats"]).unwrap(),
            "/campaigns/c-1/stats"
        );
        assert_eq!(
            segment_path(&["campaigns", "a/b?x#y", "stats"]).unwrap(),
            "/campaigns/a%2Fb%3Fx%23y/stats"
        );
    }

    #[tokio::test]
    async fn test_campaign_stats_escapes_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/campaigns/a%2Fb%3Fx/stats"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"campaignId": "a/b?x", "sentCount": 1})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let stats = client_for(&server, None)
            .campaign_stats("a/b?x")
            .await
            .unwrap();
        assert_eq!(stats.campaign_id.as_deref(), Some("a/b?x"));
        assert_eq!(stats.sent_count, 1);
    }

    #[tokio::test]
    async fn test_campaign_stats() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/campaigns/c-1/stats"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "campaignId": "c-1",
                "sentCount": 90,
                "failedCount": 10,
                "audienceSize": 120,
                "deliveryRate": 0.9
            })))
            .mount(&server)
            .await;

        let stats = client_for(&server, None).campaign_stats("c-1").await.unwrap();
        assert_eq!(stats.sent_count, 90);
        assert_eq!(stats.failed_count, 10);
        assert_eq!(stats.audience_size, 120);
        assert_eq!(stats.extra["deliveryRate"], 0.9);
    }

    #[tokio::test]
    async fn test_update_delivery() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/campaigns/delivery"))
            .and(body_json(json!({"campaignId": "c-1", "status": "completed", "sentCount": 5})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "_id": "c-1", "status": "completed", "sentCount": 5
            })))
            .expect(1)
            .mount(&server)
            .await;

        let update = DeliveryUpdate {
            campaign_id: "c-1".to_string(),
            status: Some(CampaignStatus::Completed),
            sent_count: Some(5),
            failed_count: None,
        };
        let campaign = client_for(&server, None)
            .update_delivery(&update)
            .await
            .unwrap();
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert_eq!(campaign.sent_count, 5);
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/getallcampaigns"))
            .and(header("authorization", "Bearer tok-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None)
            .with_credentials(Credentials::bearer("tok-123"))
            .unwrap();
        assert_eq!(client.credentials().map(Credentials::token), Some("tok-123"));
        client.list_campaigns().await.unwrap();
    }
}
