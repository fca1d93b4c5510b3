use crate::core::postal_code;
use crate::error::ServiceError;
use crate::models::TemperatureResult;
use crate::services::{LocationLookup, WeatherLookup};
use crate::telemetry::RequestContext;
use std::sync::Arc;
use tracing::Instrument;

/// Resolver-side pipeline: validate → location → weather → convert
///
/// Stages run strictly in order and stop at the first failure, each inside
/// its own span.
#[derive(Clone)]
pub struct TemperaturePipeline {
    locations: Arc<dyn LocationLookup>,
    weather: Arc<dyn WeatherLookup>,
}

impl TemperaturePipeline {
    pub fn new(locations: Arc<dyn LocationLookup>, weather: Arc<dyn WeatherLookup>) -> Self {
        Self { locations, weather }
    }

    pub async fn run(&self, ctx: &RequestContext, raw: &str) -> Result<TemperatureResult, ServiceError> {
        let (span, _) = ctx.stage("validate-cep");
        let code = span.in_scope(|| {
            postal_code::normalize(raw).inspect_err(|_| {
                tracing::info!("Rejected postal code {:?}", raw);
            })
        })?;

        let (span, stage) = ctx.stage("fetch-location");
        let location = self
            .locations
            .resolve(&stage, &code)
            .instrument(span)
            .await
            .inspect_err(|e| tracing::warn!("Location lookup for {} failed: {}", code, e))?;

        let (span, stage) = ctx.stage("fetch-temperature");
        let reading = self
            .weather
            .fetch(&stage, &location.city, &location.region)
            .instrument(span)
            .await
            .inspect_err(|e| {
                tracing::error!("Weather lookup for {}/{} failed: {}", location.city, location.region, e)
            })?;

        let (span, _) = ctx.stage("convert-temperatures");
        let result = span.in_scope(|| {
            let result = TemperatureResult::from_reading(location.city, reading);
            tracing::debug!(
                celsius = result.celsius,
                fahrenheit = result.fahrenheit,
                kelvin = result.kelvin,
                "Converted temperature"
            );
            result
        });

        Ok(result)
    }
}
