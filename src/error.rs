use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API key not configured")]
    MissingCredential,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Failed to fetch jobs from SerpApi")]
    Upstream { status: u16, details: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, details) = match self {
            Error::Upstream { status, details } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Failed to fetch jobs from SerpApi".to_string(),
                Some(details),
            ),
            Error::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "API key not configured".to_string(),
                None,
            ),
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg, None),
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            Error::Json(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
            Error::Reqwest(err) if err.is_timeout() => (
                StatusCode::GATEWAY_TIMEOUT,
                "Upstream search timed out".to_string(),
                None,
            ),
            Error::Reqwest(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
            Error::Io(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
        };

        let body = match details {
            Some(details) => json!({ "error": error_message, "details": details, "jobs": [] }),
            None => json!({ "error": error_message, "jobs": [] }),
        };
        (status, Json(body)).into_response()
    }
}
