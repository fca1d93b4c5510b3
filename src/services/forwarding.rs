use async_trait::async_trait;
use crate::core::PostalCode;
use crate::error::ServiceError;
use crate::models::TemperatureResult;
use crate::services::TemperatureForwarder;
use crate::telemetry::RequestContext;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Edge-side client for the resolver service
///
/// Issues `GET {base_url}/temperature/{cep}` carrying the caller's trace
/// context. The downstream payload is returned as-is.
pub struct ForwardingClient {
    base_url: String,
    timeout: Duration,
    client: Client,
}

impl ForwardingClient {
    pub fn new(base_url: String, timeout: Duration, client: Client) -> Self {
        Self {
            base_url,
            timeout,
            client,
        }
    }

    fn url_for(&self, code: &PostalCode) -> String {
        format!("{}/temperature/{}", self.base_url.trim_end_matches('/'), code)
    }
}

#[async_trait]
impl TemperatureForwarder for ForwardingClient {
    async fn forward(
        &self,
        ctx: &RequestContext,
        code: &PostalCode,
    ) -> Result<TemperatureResult, ServiceError> {
        let url = self.url_for(code);
        tracing::debug!("Forwarding {} to {}", code, url);

        let started = std::time::Instant::now();
        let response = ctx
            .decorate(self.client.get(&url), Some(self.timeout))?
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Resolver service unreachable at {}: {}", url, e);
                ServiceError::RequestError(e)
            })?;

        let status = response.status();
        tracing::info!(
            status = status.as_u16(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Resolver service responded"
        );

        if status != StatusCode::OK {
            return Err(ServiceError::ApiError(format!("Resolver service returned {}", status)));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse resolver response: {}", e)))
    }
}
