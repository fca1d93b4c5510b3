use actix_web::{http::Method, web, HttpRequest, HttpResponse};
use crate::models::{HealthResponse, HealthStatus};
use crate::services::HealthCascade;
use crate::telemetry::Tracer;

/// Handler state for the health probes
#[derive(Clone)]
pub struct HealthState {
    pub health: HealthCascade,
    pub tracer: Tracer,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/health")
            .route(web::get().to(health_check))
            .route(web::head().to(health_check)),
    )
    .route("/health/detailed", web::get().to(health_check_detailed))
    .service(
        web::resource("/ready")
            .route(web::get().to(readiness_check))
            .route(web::head().to(readiness_check)),
    )
    .service(
        web::resource("/live")
            .route(web::get().to(liveness_check))
            .route(web::head().to(liveness_check)),
    );
}

/// HEAD gets the status line only
fn respond(req: &HttpRequest, report: HealthResponse) -> HttpResponse {
    if req.method() == Method::HEAD {
        return HttpResponse::Ok().finish();
    }
    HttpResponse::Ok().json(report)
}

async fn health_check(state: web::Data<HealthState>, req: HttpRequest) -> HttpResponse {
    respond(&req, state.health.basic())
}

async fn readiness_check(state: web::Data<HealthState>, req: HttpRequest) -> HttpResponse {
    respond(&req, state.health.readiness())
}

async fn liveness_check(state: web::Data<HealthState>, req: HttpRequest) -> HttpResponse {
    respond(&req, state.health.liveness())
}

/// Dependency-aware check; 503 when degraded
async fn health_check_detailed(state: web::Data<HealthState>, req: HttpRequest) -> HttpResponse {
    let ctx = state.tracer.start_from(&req);
    let report = state.health.detailed(&ctx).await;

    if report.status == HealthStatus::Degraded {
        HttpResponse::ServiceUnavailable().json(report)
    } else {
        HttpResponse::Ok().json(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use std::time::Duration;

    fn state(downstream: Option<String>) -> HealthState {
        HealthState {
            health: HealthCascade::new(
                "cep-temperatura".to_string(),
                true,
                downstream,
                Duration::from_secs(5),
                reqwest::Client::new(),
            ),
            tracer: Tracer::new("test", Duration::from_secs(10)),
        }
    }

    #[actix_web::test]
    async fn test_head_returns_empty_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .configure(configure),
        )
        .await;

        for uri in ["/health", "/ready", "/live"] {
            let req = test::TestRequest::default()
                .method(Method::HEAD)
                .uri(uri)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), 200, "HEAD {}", uri);
            let body = test::read_body(resp).await;
            assert!(body.is_empty());
        }
    }

    #[actix_web::test]
    async fn test_get_returns_status_body() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state(None)))
                .configure(configure),
        )
        .await;

        for (uri, status) in [("/health", "ok"), ("/ready", "ready"), ("/live", "alive")] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["status"], status);
        }
    }
}
