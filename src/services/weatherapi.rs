use async_trait::async_trait;
use crate::error::ServiceError;
use crate::models::WeatherReading;
use crate::services::WeatherLookup;
use crate::telemetry::RequestContext;
use reqwest::Client;
use serde::Deserialize;

/// WeatherAPI.com current-conditions client
pub struct WeatherApiClient {
    base_url: String,
    api_key: String,
    country: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
}

impl WeatherApiClient {
    pub fn new(base_url: String, api_key: String, country: String, client: Client) -> Self {
        Self {
            base_url,
            api_key,
            country,
            client,
        }
    }

    /// "{city}, {region}, {country}"
    fn query_for(&self, city: &str, region: &str) -> String {
        format!("{}, {}, {}", city, region, self.country)
    }

    fn url_for(&self, city: &str, region: &str) -> String {
        format!(
            "{}/current.json?key={}&q={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&self.api_key),
            urlencoding::encode(&self.query_for(city, region))
        )
    }
}

#[async_trait]
impl WeatherLookup for WeatherApiClient {
    async fn fetch(
        &self,
        ctx: &RequestContext,
        city: &str,
        region: &str,
    ) -> Result<WeatherReading, ServiceError> {
        tracing::debug!("Fetching weather for {}", self.query_for(city, region));

        let response = ctx
            .decorate(self.client.get(self.url_for(city, region)), None)?
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Weather lookup for {}/{} failed: {} - {}", city, region, status, body);
            return Err(ServiceError::ApiError(format!("Weather lookup failed: {}", status)));
        }

        let body = response.text().await?;
        let parsed: CurrentResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse weather response: {}", e)))?;

        Ok(WeatherReading {
            celsius: parsed.current.temp_c,
        })
    }
}
