//! HTTP client for SMM-panel style provider APIs.
//!
//! The panel exposes a single endpoint and switches on the `action` field:
//! - `balance` is posted as JSON and answers `{ balance, currency }`
//! - `status` is posted URL-encoded with a comma-joined `orders` list and
//!   answers a mapping of order id to status record
//!
//! Panels report request-level failures as `{"error": "..."}` with HTTP 200.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ProviderConfig;
use crate::errors::ProviderError;
use crate::models::{OrderStatusBatch, ProviderBalance};
use crate::{ProviderClient, MAX_STATUS_BATCH};

const PROVIDER_ID: &str = "SMM_PANEL";

#[derive(Serialize)]
struct ActionRequest<'a> {
    key: &'a str,
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    orders: Option<String>,
}

/// Provider client speaking the SMM-panel HTTP API.
pub struct SmmPanelClient {
    client: Client,
    config: ProviderConfig,
}

impl SmmPanelClient {
    /// Creates a client whose every request is bounded by `config.timeout`.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ProviderError::ClientBuild)?;

        Ok(Self { client, config })
    }

    fn ensure_configured(&self) -> Result<(), ProviderError> {
        if self.config.is_configured() {
            Ok(())
        } else {
            Err(ProviderError::NotConfigured(
                "provider API URL and key are required".to_string(),
            ))
        }
    }

    fn map_send_error(err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout {
                provider: PROVIDER_ID.to_string(),
            }
        } else {
            ProviderError::Network(err)
        }
    }

    /// Sends a prepared request and returns the decoded JSON body.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, ProviderError> {
        let response = request.send().await.map_err(Self::map_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{} returned HTTP {}", PROVIDER_ID, status);
            return Err(ProviderError::Http {
                provider: PROVIDER_ID.to_string(),
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        let text = response.text().await.map_err(Self::map_send_error)?;
        let value = parse_body(&text)?;

        if let Some(message) = rejection_message(&value) {
            warn!("{} rejected request: {}", PROVIDER_ID, message);
            return Err(ProviderError::Rejected {
                provider: PROVIDER_ID.to_string(),
                message,
            });
        }

        Ok(value)
    }
}

/// Decodes a response body as JSON.
fn parse_body(text: &str) -> Result<Value, ProviderError> {
    serde_json::from_str(text).map_err(|e| ProviderError::MalformedResponse {
        provider: PROVIDER_ID.to_string(),
        message: format!("invalid JSON: {}", e),
    })
}

/// Extracts a request-level `{"error": "..."}` message, if present.
fn rejection_message(value: &Value) -> Option<String> {
    value
        .get("error")
        .and_then(Value::as_str)
        .map(|s| s.to_string())
}

#[async_trait]
impl ProviderClient for SmmPanelClient {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn balance(&self) -> Result<ProviderBalance, ProviderError> {
        self.ensure_configured()?;
        debug!("{} balance request", PROVIDER_ID);

        let body = ActionRequest {
            key: &self.config.api_key,
            action: "balance",
            orders: None,
        };
        let value = self
            .send(self.client.post(&self.config.api_url).json(&body))
            .await?;

        ProviderBalance::from_value(&value).ok_or_else(|| ProviderError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message: "balance response is missing a numeric balance".to_string(),
        })
    }

    async fn order_statuses(&self, order_ids: &[String]) -> Result<OrderStatusBatch, ProviderError> {
        if order_ids.is_empty() {
            return Ok(OrderStatusBatch::default());
        }
        if order_ids.len() > MAX_STATUS_BATCH {
            return Err(ProviderError::BatchTooLarge {
                size: order_ids.len(),
                max: MAX_STATUS_BATCH,
            });
        }
        self.ensure_configured()?;
        debug!("{} status request for {} orders", PROVIDER_ID, order_ids.len());

        let body = ActionRequest {
            key: &self.config.api_key,
            action: "status",
            orders: Some(order_ids.join(",")),
        };
        let value = self
            .send(self.client.post(&self.config.api_url).form(&body))
            .await?;

        OrderStatusBatch::from_value(&value).ok_or_else(|| ProviderError::MalformedResponse {
            provider: PROVIDER_ID.to_string(),
            message: "status response is not an object keyed by order id".to_string(),
        })
    }
}
