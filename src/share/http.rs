use crate::config::PublishConfig;
use crate::share::endpoint::PublishEndpoint;
use crate::share::error::EndpointError;
use crate::share::summary::ShareCardPayload;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Publish endpoint reached over HTTP with a JSON POST
#[derive(Clone)]
pub struct HttpPublishEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpPublishEndpoint {
    /// Create a new HttpPublishEndpoint from configuration
    pub fn new(config: &PublishConfig) -> Result<Self, EndpointError> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| EndpointError::Unknown(Some(format!("Failed to build HTTP client: {}", e))))?;

        info!("Publishing share cards to {}", config.endpoint);
        Ok(Self {
            client,
            url: config.endpoint.clone(),
        })
    }
}

/// Pull a human-readable message out of an error response body
fn error_message_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .filter_map(|key| value.get(key).and_then(|v| v.as_str()))
        .find(|message| !message.is_empty())
        .map(str::to_string)
}

/// Parse a success body; an empty body is `null`
fn parse_success_body(body: &str) -> Result<serde_json::Value, EndpointError> {
    if body.trim().is_empty() {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|e| EndpointError::Unknown(Some(format!("Invalid response body: {}", e))))
}

#[async_trait]
impl PublishEndpoint for HttpPublishEndpoint {
    async fn publish(
        &self,
        payload: &ShareCardPayload,
    ) -> Result<serde_json::Value, EndpointError> {
        debug!(
            "Posting share card for {}#{} to {}",
            payload.player.riot_id, payload.player.tag_line, self.url
        );

        let response = self
            .client
            .post(&self.url)
            .json(payload)
            .send()
            .await
            .map_err(|e| EndpointError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EndpointError::Network(e.to_string()))?;

        if !status.is_success() {
            warn!("Publish endpoint returned HTTP {}", status.as_u16());
            return Err(EndpointError::Rejected {
                status: status.as_u16(),
                message: error_message_from_body(&body),
            });
        }

        parse_success_body(&body)
    }
}
