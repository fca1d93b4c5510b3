use actix_web::{error, http::StatusCode, HttpResponse};
use crate::models::MessageResponse;
use thiserror::Error;

pub const MSG_INVALID_ZIPCODE: &str = "invalid zipcode";
pub const MSG_NOT_FOUND: &str = "can not find zipcode";
pub const MSG_INVALID_REQUEST: &str = "invalid request format";
pub const MSG_UPSTREAM: &str = "failed to fetch temperature";

/// Errors produced while resolving a postal code to a temperature
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid zipcode")]
    InvalidFormat,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("can not find zipcode")]
    NotFound,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

impl ServiceError {
    /// True for every failure that came from (or on the way to) another service
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            ServiceError::RequestError(_)
                | ServiceError::ApiError(_)
                | ServiceError::InvalidResponse(_)
                | ServiceError::DeadlineExceeded
        )
    }

    /// Message exposed to clients; upstream details stay in the logs
    pub fn public_message(&self) -> &'static str {
        match self {
            ServiceError::InvalidFormat => MSG_INVALID_ZIPCODE,
            ServiceError::InvalidRequest(_) => MSG_INVALID_REQUEST,
            ServiceError::NotFound => MSG_NOT_FOUND,
            _ => MSG_UPSTREAM,
        }
    }
}

impl error::ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidFormat => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(MessageResponse::new(self.public_message()))
    }
}

/// Handle JSON payload errors (bad JSON, wrong content type, oversized body)
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ServiceError::InvalidRequest(err.to_string()).into()
}
