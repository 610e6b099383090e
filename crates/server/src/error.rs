use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use enrichment::{EnrichmentError, EnrichmentResponse};
use semantic::SemanticError;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Unparseable batch: {0}")]
    InvalidBatch(#[from] EnrichmentError),

    #[error("Provider error: {0}")]
    Provider(#[from] SemanticError),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found")]
    NotFound,
}

/// Body of a rejected batch: the empty output collection plus the error.
#[derive(Debug, Serialize)]
struct RejectedBatch {
    #[serde(flatten)]
    response: EnrichmentResponse,
    error: serde_json::Value,
}

/// API error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            // Unparseable batches answer 401, the status the skill contract expects.
            ServerError::Authentication(_) | ServerError::InvalidBatch(_) => {
                StatusCode::UNAUTHORIZED
            }
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::Provider(_) => StatusCode::BAD_GATEWAY,
            ServerError::Internal(_) | ServerError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code string
    fn error_code(&self) -> &'static str {
        match self {
            ServerError::Authentication(_) => "AUTH_FAILED",
            ServerError::InvalidBatch(_) => "INVALID_BATCH",
            ServerError::Provider(_) => "PROVIDER_ERROR",
            ServerError::Internal(_) => "INTERNAL_ERROR",
            ServerError::Config(_) => "CONFIG_ERROR",
            ServerError::NotFound => "NOT_FOUND",
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = json!({
            "code": self.error_code(),
            "message": self.to_string(),
        });

        // A rejected batch still answers with the (empty) output collection.
        let body = match self {
            ServerError::InvalidBatch(_) => json!(RejectedBatch {
                response: EnrichmentResponse::empty(),
                error,
            }),
            _ => json!({ "error": error }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<std::net::AddrParseError> for ServerError {
    fn from(err: std::net::AddrParseError) -> Self {
        ServerError::Config(format!("Invalid address: {err}"))
    }
}

impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {err}"))
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}
