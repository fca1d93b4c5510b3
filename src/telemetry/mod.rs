// Telemetry exports
pub mod trace;

pub use trace::{RequestContext, Tracer, TRACEPARENT, TRACER_NAME};

use crate::config::LoggingSettings;
use opentelemetry::trace::TracerProvider as _;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global log subscriber
///
/// `LOG_LEVEL` and `LOG_FORMAT` override the configured values so operators
/// can change verbosity without touching config files. `tracing` spans are
/// bridged into the tracer's OpenTelemetry provider.
pub fn init_logging(settings: &LoggingSettings, tracer: &Tracer) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.format.clone());

    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let otel_layer =
        tracing_opentelemetry::OpenTelemetryLayer::new(tracer.provider().tracer(TRACER_NAME));
    let registry = tracing_subscriber::registry().with(filter).with(otel_layer);

    match format.as_str() {
        "pretty" => registry.with(fmt::layer().pretty().with_target(false)).init(),
        "json" => registry.with(fmt::layer().json().with_target(false)).init(),
        _ => registry.with(fmt::layer().with_target(false)).init(),
    }
}
