use crate::core::postal_code;
use crate::models::{CheckStatus, HealthResponse, HealthStatus};
use crate::telemetry::RequestContext;
use reqwest::{Client, StatusCode};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::Instrument;

/// Known-good postal code used to exercise the validator
pub const CANARY_POSTAL_CODE: &str = "01310100";

/// Health probes for one service, optionally reaching its downstream peer
///
/// Probes never fail: problems are reported as per-check values and only
/// change the aggregate status.
#[derive(Clone)]
pub struct HealthCascade {
    service: String,
    weather_configured: bool,
    downstream: Option<String>,
    probe_timeout: Duration,
    client: Client,
}

impl HealthCascade {
    pub fn new(
        service: String,
        weather_configured: bool,
        downstream: Option<String>,
        probe_timeout: Duration,
        client: Client,
    ) -> Self {
        Self {
            service,
            weather_configured,
            downstream: downstream.filter(|u| !u.trim().is_empty()),
            probe_timeout,
            client,
        }
    }

    fn report(&self, status: HealthStatus, checks: BTreeMap<String, CheckStatus>) -> HealthResponse {
        HealthResponse {
            status,
            service: self.service.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: chrono::Utc::now(),
            checks,
        }
    }

    /// Process is up and answering
    pub fn basic(&self) -> HealthResponse {
        let checks = BTreeMap::from([("overall".to_string(), CheckStatus::Ok)]);
        self.report(HealthStatus::Ok, checks)
    }

    pub fn readiness(&self) -> HealthResponse {
        let checks = BTreeMap::from([
            ("service".to_string(), CheckStatus::Ok),
            ("dependencies".to_string(), CheckStatus::Ok),
        ]);
        self.report(HealthStatus::Ready, checks)
    }

    pub fn liveness(&self) -> HealthResponse {
        let checks = BTreeMap::from([("service".to_string(), CheckStatus::Ok)]);
        self.report(HealthStatus::Alive, checks)
    }

    /// Validator canary, weather capability, and downstream reachability
    pub async fn detailed(&self, ctx: &RequestContext) -> HealthResponse {
        let mut checks = BTreeMap::new();

        let cep = if postal_code::validate(CANARY_POSTAL_CODE) {
            CheckStatus::Ok
        } else {
            CheckStatus::Error
        };
        checks.insert("cep_service".to_string(), cep);

        let weather = if self.weather_configured {
            CheckStatus::Ok
        } else {
            CheckStatus::NotConfigured
        };
        checks.insert("weather_service".to_string(), weather);

        if let Some(base) = &self.downstream {
            let (span, stage) = ctx.stage("check-service-b");
            let status = self.probe_downstream(&stage, base).instrument(span).await;
            checks.insert("service_b".to_string(), status);
        }

        let status = HealthStatus::aggregate(&checks);
        if status == HealthStatus::Degraded {
            tracing::warn!("Detailed health check degraded: {:?}", checks);
        }
        self.report(status, checks)
    }

    /// One `GET {base}/health`; only a 200 counts as reachable
    async fn probe_downstream(&self, ctx: &RequestContext, base: &str) -> CheckStatus {
        let url = format!("{}/health", base.trim_end_matches('/'));

        let request = match ctx.decorate(self.client.get(&url), Some(self.probe_timeout)) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!("Skipping downstream probe to {}: {}", url, e);
                return CheckStatus::Error;
            }
        };

        match request.send().await {
            Ok(response) if response.status() == StatusCode::OK => CheckStatus::Ok,
            Ok(response) => {
                tracing::warn!("Downstream probe to {} returned {}", url, response.status());
                CheckStatus::Error
            }
            Err(e) => {
                tracing::warn!("Downstream probe to {} failed: {}", url, e);
                CheckStatus::Error
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::Tracer;

    fn ctx() -> RequestContext {
        Tracer::new("test", Duration::from_secs(10)).start(None)
    }

    fn cascade(weather: bool, downstream: Option<String>) -> HealthCascade {
        HealthCascade::new(
            "cep-temperatura".to_string(),
            weather,
            downstream,
            Duration::from_secs(5),
            Client::new(),
        )
    }

    #[tokio::test]
    async fn test_detailed_without_downstream() {
        let report = cascade(true, None).detailed(&ctx()).await;

        assert_eq!(report.status, HealthStatus::Ok);
        assert_eq!(report.checks["cep_service"], CheckStatus::Ok);
        assert_eq!(report.checks["weather_service"], CheckStatus::Ok);
        assert!(!report.checks.contains_key("service_b"));
    }

    #[tokio::test]
    async fn test_detailed_downstream_healthy() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/health")
            .match_header("traceparent", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":"ok"}"#)
            .expect(1)
            .create_async()
            .await;

        let report = cascade(false, Some(server.url())).detailed(&ctx()).await;

        assert_eq!(report.status, HealthStatus::Ok);
        assert_eq!(report.checks["weather_service"], CheckStatus::NotConfigured);
        assert_eq!(report.checks["service_b"], CheckStatus::Ok);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_detailed_downstream_unhealthy() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/health")
            .with_status(500)
            .create_async()
            .await;

        let report = cascade(false, Some(server.url())).detailed(&ctx()).await;

        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.checks["service_b"], CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_detailed_downstream_unreachable() {
        let report = cascade(false, Some("http://127.0.0.1:9".to_string()))
            .detailed(&ctx())
            .await;

        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.checks["service_b"], CheckStatus::Error);
    }

    #[tokio::test]
    async fn test_detailed_downstream_silent_is_cut_off() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let health = HealthCascade::new(
            "cep-temperatura".to_string(),
            false,
            Some(base_url),
            Duration::from_millis(200),
            Client::new(),
        );

        let report = tokio::time::timeout(Duration::from_secs(2), health.detailed(&ctx()))
            .await
            .expect("probe outlived its timeout");

        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.checks["service_b"], CheckStatus::Error);
    }

    #[test]
    fn test_static_probes() {
        let health = cascade(true, None);
        assert_eq!(health.basic().status, HealthStatus::Ok);
        assert_eq!(health.readiness().status, HealthStatus::Ready);
        assert_eq!(health.liveness().status, HealthStatus::Alive);
        assert_eq!(health.basic().checks["overall"], CheckStatus::Ok);
    }
}
