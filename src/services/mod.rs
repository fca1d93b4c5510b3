// Service exports
pub mod forwarding;
pub mod health;
pub mod viacep;
pub mod weatherapi;

pub use forwarding::ForwardingClient;
pub use health::{HealthCascade, CANARY_POSTAL_CODE};
pub use viacep::ViaCepClient;
pub use weatherapi::WeatherApiClient;

use async_trait::async_trait;
use crate::core::PostalCode;
use crate::error::ServiceError;
use crate::models::{Location, TemperatureResult, WeatherReading};
use crate::telemetry::RequestContext;
use reqwest::Client;
use std::time::Duration;

/// Directory lookup: postal code to city/region
#[async_trait]
pub trait LocationLookup: Send + Sync {
    async fn resolve(&self, ctx: &RequestContext, code: &PostalCode) -> Result<Location, ServiceError>;
}

/// Weather provider: city/region to current temperature
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn fetch(
        &self,
        ctx: &RequestContext,
        city: &str,
        region: &str,
    ) -> Result<WeatherReading, ServiceError>;
}

/// Relay of a validated postal code to the resolver service
#[async_trait]
pub trait TemperatureForwarder: Send + Sync {
    async fn forward(
        &self,
        ctx: &RequestContext,
        code: &PostalCode,
    ) -> Result<TemperatureResult, ServiceError>;
}

/// Build the pooled outbound client shared by every service in the process
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("cep-temperature/", env!("CARGO_PKG_VERSION")))
        .build()
}
