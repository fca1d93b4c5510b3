use actix_web::{web, HttpRequest, HttpResponse};
use crate::core::TemperaturePipeline;
use crate::error::ServiceError;
use crate::telemetry::Tracer;

/// Handler state for the resolver service
#[derive(Clone)]
pub struct ResolverState {
    pub pipeline: TemperaturePipeline,
    pub tracer: Tracer,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/temperature/{cep}", web::get().to(get_temperature));
}

/// Temperature for a postal code
///
/// GET /temperature/{cep}
///
/// Response:
/// ```json
/// { "city": "São Paulo", "temp_c": 28.5, "temp_f": 83.3, "temp_k": 301.5 }
/// ```
async fn get_temperature(
    state: web::Data<ResolverState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, ServiceError> {
    let cep = path.into_inner();
    let ctx = state.tracer.start_from(&req);

    tracing::info!(trace_id = %ctx.trace_id(), "Resolving temperature for {}", cep);

    let result = state.pipeline.run(&ctx, &cep).await?;

    tracing::info!(
        trace_id = %ctx.trace_id(),
        "Returning {:.1}°C for {}",
        result.celsius,
        result.city
    );

    Ok(HttpResponse::Ok().json(result))
}
