//! CEP Temperature - postal code to current temperature
//!
//! Two cooperating HTTP services share this crate:
//! - the **edge** service validates `POST /cep` and forwards to the resolver
//! - the **resolver** service maps a postal code to a location (ViaCEP) and the
//!   location to a temperature (WeatherAPI), answering `GET /temperature/{cep}`

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod telemetry;

// Re-export commonly used types
pub use crate::core::{convert, normalize, validate, PostalCode, TemperaturePipeline};
pub use crate::error::ServiceError;
pub use crate::models::{Location, TemperatureResult, WeatherReading};
