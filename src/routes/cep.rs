use actix_web::{web, HttpRequest, HttpResponse};
use crate::core::normalize;
use crate::error::{handle_json_payload_error, ServiceError};
use crate::models::CepRequest;
use crate::services::TemperatureForwarder;
use crate::telemetry::Tracer;
use std::sync::Arc;
use tracing::Instrument;
use validator::Validate;

/// Handler state for the edge service
#[derive(Clone)]
pub struct EdgeState {
    pub forwarder: Arc<dyn TemperatureForwarder>,
    pub tracer: Tracer,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    // Bodies are decoded as JSON whatever their declared content type
    let json = web::JsonConfig::default()
        .content_type_required(false)
        .content_type(|_| true)
        .error_handler(handle_json_payload_error);

    cfg.app_data(json).route("/cep", web::post().to(post_cep));
}

/// Validate a postal code and relay it to the resolver service
///
/// POST /cep
///
/// Request body:
/// ```json
/// { "cep": "01310-100" }
/// ```
async fn post_cep(
    state: web::Data<EdgeState>,
    body: web::Json<CepRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, ServiceError> {
    let ctx = state.tracer.start_from(&req);

    if let Err(errors) = body.validate() {
        tracing::info!("Validation failed for /cep request: {}", errors);
        return Err(ServiceError::InvalidRequest(errors.to_string()));
    }

    let (span, _) = ctx.stage("validate-cep");
    let code = span.in_scope(|| normalize(&body.cep)).inspect_err(|_| {
        tracing::info!(trace_id = %ctx.trace_id(), "Rejected postal code {:?}", body.cep);
    })?;

    let (span, stage) = ctx.stage("call-service-b");
    let result = state
        .forwarder
        .forward(&stage, &code)
        .instrument(span)
        .await
        .inspect_err(|e| {
            tracing::error!(trace_id = %ctx.trace_id(), "Forwarding {} failed: {}", code, e);
        })?;

    tracing::info!(trace_id = %ctx.trace_id(), "Forwarded {} -> {}", code, result.city);

    Ok(HttpResponse::Ok().json(result))
}
