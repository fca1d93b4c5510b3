use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use cep_temperature::config::{ServiceRole, Settings};
use cep_temperature::core::TemperaturePipeline;
use cep_temperature::routes::{self, EdgeState, HealthState, ResolverState};
use cep_temperature::services::{
    build_http_client, ForwardingClient, HealthCascade, ViaCepClient, WeatherApiClient,
};
use cep_temperature::telemetry::{self, Tracer};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

fn invalid_config(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(invalid_config)?;

    let tracer = Tracer::new(settings.service.name.clone(), settings.request_timeout());
    telemetry::init_logging(&settings.logging, &tracer);

    if let Err(e) = settings.validate() {
        error!("Invalid configuration: {}", e);
        return Err(invalid_config(e));
    }

    let role = settings.service.role;
    info!("Starting {} ({:?} role)...", settings.service.name, role);

    let client = build_http_client(Duration::from_secs(settings.downstream.timeout_secs))
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    let health_state = HealthState {
        health: HealthCascade::new(
            settings.service.name.clone(),
            role == ServiceRole::Resolver && settings.weather.api_key.is_some(),
            if role == ServiceRole::Edge { settings.downstream.url.clone() } else { None },
            Duration::from_secs(settings.health.probe_timeout_secs),
            client.clone(),
        ),
        tracer: tracer.clone(),
    };

    let (host, port) = settings.server_address();
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    match role {
        ServiceRole::Resolver => {
            let locations = Arc::new(ViaCepClient::new(settings.viacep.base_url.clone(), client.clone()));
            let weather = Arc::new(WeatherApiClient::new(
                settings.weather.base_url.clone(),
                settings.weather.api_key.clone().unwrap_or_default(),
                settings.weather.country.clone(),
                client.clone(),
            ));
            let state = ResolverState {
                pipeline: TemperaturePipeline::new(locations, weather),
                tracer,
            };

            info!("Resolver pipeline initialized (directory: {}, weather: {})",
                settings.viacep.base_url, settings.weather.base_url);

            HttpServer::new(move || {
                App::new()
                    .app_data(web::Data::new(state.clone()))
                    .app_data(web::Data::new(health_state.clone()))
                    .wrap(Cors::permissive())
                    .wrap(middleware::Logger::default())
                    .configure(routes::configure_resolver)
            })
            .workers(workers)
            .bind((host, port))?
            .run()
            .await
        }
        ServiceRole::Edge => {
            let downstream = settings.downstream.url.clone().unwrap_or_default();
            let state = EdgeState {
                forwarder: Arc::new(ForwardingClient::new(
                    downstream.clone(),
                    Duration::from_secs(settings.downstream.timeout_secs),
                    client.clone(),
                )),
                tracer,
            };

            info!("Forwarding to resolver service at {}", downstream);

            HttpServer::new(move || {
                App::new()
                    .app_data(web::Data::new(state.clone()))
                    .app_data(web::Data::new(health_state.clone()))
                    .wrap(Cors::permissive())
                    .wrap(middleware::Logger::default())
                    .configure(routes::configure_edge)
            })
            .workers(workers)
            .bind((host, port))?
            .run()
            .await
        }
    }
}
