use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub viacep: ViaCepSettings,
    #[serde(default)]
    pub weather: WeatherSettings,
    #[serde(default)]
    pub downstream: DownstreamSettings,
    #[serde(default)]
    pub health: HealthSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Which of the two services this process runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceRole {
    /// Validates `POST /cep` and forwards to the resolver
    Edge,
    /// Serves `GET /temperature/{cep}`
    Resolver,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceSettings {
    #[serde(default = "default_role")]
    pub role: ServiceRole,
    #[serde(default = "default_service_name")]
    pub name: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            role: default_role(),
            name: default_service_name(),
        }
    }
}

fn default_role() -> ServiceRole { ServiceRole::Resolver }
fn default_service_name() -> String { "cep-temperatura".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
    /// Deadline for a whole inbound request, outbound calls included
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_request_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct ViaCepSettings {
    #[serde(default = "default_viacep_url")]
    pub base_url: String,
}

impl Default for ViaCepSettings {
    fn default() -> Self {
        Self { base_url: default_viacep_url() }
    }
}

fn default_viacep_url() -> String { "https://viacep.com.br/ws".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherSettings {
    #[serde(default = "default_weather_url")]
    pub base_url: String,
    pub api_key: Option<String>,
    /// Appended to every weather query, e.g. "São Paulo, SP, Brazil"
    #[serde(default = "default_country")]
    pub country: String,
}

impl Default for WeatherSettings {
    fn default() -> Self {
        Self {
            base_url: default_weather_url(),
            api_key: None,
            country: default_country(),
        }
    }
}

fn default_weather_url() -> String { "http://api.weatherapi.com/v1".to_string() }
fn default_country() -> String { "Brazil".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct DownstreamSettings {
    /// Base URL of the resolver service (edge role only)
    pub url: Option<String>,
    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
}

impl Default for DownstreamSettings {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_client_timeout(),
        }
    }
}

fn default_client_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct HealthSettings {
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Default for HealthSettings {
    fn default() -> Self {
        Self { probe_timeout_secs: default_probe_timeout() }
    }
}

fn default_probe_timeout() -> u64 { 5 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CEPTEMP__)
    /// 5. Plain deployment variables (PORT, WEATHER_API_KEY, SERVICE_B_URL, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., CEPTEMP__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("CEPTEMP")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_deployment_vars(settings, |key| std::env::var(key).ok())?;

        settings.try_deserialize()
    }

    /// Reject configurations the selected role cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("server port is required".into()));
        }

        match self.service.role {
            ServiceRole::Resolver => {
                let has_key = self
                    .weather
                    .api_key
                    .as_deref()
                    .is_some_and(|k| !k.trim().is_empty());
                if !has_key {
                    return Err(ConfigError::Message("weather API key is required".into()));
                }
            }
            ServiceRole::Edge => {
                if self.downstream.url.as_deref().map_or(true, |u| u.trim().is_empty()) {
                    return Err(ConfigError::Message("downstream service URL is required".into()));
                }
            }
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn server_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }
}

/// Map the unprefixed variable names used by existing deployments onto config keys
const DEPLOYMENT_VARS: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("HOST", "server.host"),
    ("SERVICE_ROLE", "service.role"),
    ("WEATHER_API_KEY", "weather.api_key"),
    ("WEATHER_BASE_URL", "weather.base_url"),
    ("SERVICE_B_URL", "downstream.url"),
];

/// Overlay deployment variables on top of the loaded config
fn apply_deployment_vars<F>(settings: Config, lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = Config::builder().add_source(settings);

    for (var, key) in DEPLOYMENT_VARS {
        if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
            builder = builder.set_override(*key, value)?;
        }
    }

    builder.build()
}
