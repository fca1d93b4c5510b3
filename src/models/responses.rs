use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use crate::models::domain::{CheckStatus, HealthStatus};

/// Error body: `{"message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// Health probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub checks: BTreeMap<String, CheckStatus>,
}
