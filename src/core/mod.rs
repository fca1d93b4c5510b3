// Core exports
pub mod pipeline;
pub mod postal_code;
pub mod units;

pub use pipeline::TemperaturePipeline;
pub use postal_code::{normalize, validate, PostalCode};
pub use units::convert;
