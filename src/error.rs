use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid address: {0}")] InvalidAddress(String),

    #[error("Invalid query: {0}")] InvalidQuery(String),

    #[error("Web3 not connected")]
    ProviderUnavailable,

    #[error("RPC error: {0}")] ProviderCallFailed(String),

    #[error("OPENAI_API_KEY missing")]
    LlmMisconfigured,

    #[error("LLM error: {0}")] LlmCallFailed(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

/// JSON body returned for every failed request.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl AppError {
    /// Only the provider outage and the missing LLM credential get their own
    /// status codes; everything else is reported as a bad request.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::LlmMisconfigured => StatusCode::INTERNAL_SERVER_ERROR,
            | AppError::InvalidAddress(_)
            | AppError::InvalidQuery(_)
            | AppError::ProviderCallFailed(_)
            | AppError::LlmCallFailed(_)
            | AppError::Config(_)
            | AppError::Internal(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            detail: self.to_string(),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidQuery(rejection.body_text())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "Request rejected");
        }

        let response = self.to_error_response();
        (status, axum::Json(response)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
