// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Location, WeatherReading, TemperatureResult, HealthStatus, CheckStatus};
pub use requests::CepRequest;
pub use responses::{HealthResponse, MessageResponse};
