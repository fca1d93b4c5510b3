use async_trait::async_trait;
use crate::core::PostalCode;
use crate::error::ServiceError;
use crate::models::Location;
use crate::services::LocationLookup;
use crate::telemetry::RequestContext;
use reqwest::Client;
use serde::{Deserialize, Deserializer};

/// ViaCEP directory client
///
/// `GET {base_url}/{cep}/json/` returns the address for a postal code, or a
/// body of `{"erro": true}` when the code does not exist.
pub struct ViaCepClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default, deserialize_with = "deserialize_flag")]
    erro: bool,
    localidade: Option<String>,
    uf: Option<String>,
}

/// ViaCEP has returned the flag both as `true` and as `"true"`
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Text(s) => s.eq_ignore_ascii_case("true"),
    })
}

impl ViaCepClient {
    pub fn new(base_url: String, client: Client) -> Self {
        Self { base_url, client }
    }

    fn url_for(&self, code: &PostalCode) -> String {
        format!("{}/{}/json/", self.base_url.trim_end_matches('/'), code)
    }
}

#[async_trait]
impl LocationLookup for ViaCepClient {
    async fn resolve(&self, ctx: &RequestContext, code: &PostalCode) -> Result<Location, ServiceError> {
        let url = self.url_for(code);
        tracing::debug!("Fetching location from: {}", url);

        let response = ctx.decorate(self.client.get(&url), None)?.send().await?;

        if !response.status().is_success() {
            return Err(ServiceError::ApiError(format!(
                "Directory lookup failed: {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        let parsed: ViaCepResponse = serde_json::from_str(&body)
            .map_err(|e| ServiceError::InvalidResponse(format!("Failed to parse directory response: {}", e)))?;

        if parsed.erro {
            tracing::info!("Postal code {} not found in directory", code);
            return Err(ServiceError::NotFound);
        }

        match (parsed.localidade, parsed.uf) {
            (Some(city), Some(region)) if !city.is_empty() && !region.is_empty() => {
                Ok(Location { city, region })
            }
            _ => Err(ServiceError::InvalidResponse(
                "Directory response missing localidade/uf".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::normalize;
    use crate::telemetry::Tracer;
    use std::time::Duration;

    fn ctx() -> RequestContext {
        Tracer::new("test", Duration::from_secs(5)).start(None)
    }

    async fn lookup(server: &mockito::Server, raw: &str) -> Result<Location, ServiceError> {
        let client = ViaCepClient::new(server.url(), Client::new());
        client.resolve(&ctx(), &normalize(raw).unwrap()).await
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/01310100/json/")
            .match_header("traceparent", mockito::Matcher::Regex(r"^00-[0-9a-f]{32}-[0-9a-f]{16}-01$".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"cep":"01310-100","logradouro":"Avenida Paulista","localidade":"São Paulo","uf":"SP"}"#)
            .expect(1)
            .create_async()
            .await;

        let location = lookup(&server, "01310-100").await.unwrap();
        assert_eq!(location.city, "São Paulo");
        assert_eq!(location.region, "SP");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_resolve_not_found_flag() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/99999999/json/")
            .with_status(200)
            .with_body(r#"{"erro": true}"#)
            .create_async()
            .await;

        assert!(matches!(lookup(&server, "99999999").await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_resolve_not_found_string_flag() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/99999999/json/")
            .with_status(200)
            .with_body(r#"{"erro": "true"}"#)
            .create_async()
            .await;

        assert!(matches!(lookup(&server, "99999999").await, Err(ServiceError::NotFound)));
    }

    #[tokio::test]
    async fn test_resolve_server_error_is_upstream() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/01310100/json/")
            .with_status(502)
            .create_async()
            .await;

        let err = lookup(&server, "01310100").await.unwrap_err();
        assert!(err.is_upstream());
    }

    #[tokio::test]
    async fn test_resolve_malformed_body_is_upstream() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/01310100/json/")
            .with_status(200)
            .with_body("<html>busy</html>")
            .create_async()
            .await;

        let err = lookup(&server, "01310100").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_resolve_blank_region_is_upstream() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/01310100/json/")
            .with_status(200)
            .with_body(r#"{"cep":"01310-100","localidade":"São Paulo","uf":""}"#)
            .create_async()
            .await;

        let err = lookup(&server, "01310100").await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidResponse(_)));
    }
}
