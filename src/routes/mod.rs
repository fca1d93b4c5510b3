// Route exports
pub mod cep;
pub mod health;
pub mod temperature;

use actix_web::web;

pub use cep::EdgeState;
pub use health::HealthState;
pub use temperature::ResolverState;

/// Routes served by the resolver service
pub fn configure_resolver(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure)
        .configure(temperature::configure);
}

/// Routes served by the edge service
pub fn configure_edge(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure)
        .configure(cep::configure);
}
